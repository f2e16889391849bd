//! Command dispatch - raw input lines to engine actions.

use grid_rules::{CommandAction, GameView, LogStyle, SoundCue, SoundEffect, PENDING_NAME};

use super::{Engine, HostRequest};

/// Raw literal that bypasses the command table entirely.
const SCREENSAVER_LITERAL: &str = "screensaver.exe";

/// Case-fold and strip diacritics so accented input matches table entries.
pub fn normalize(input: &str) -> String {
    input.to_lowercase().chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

impl Engine {
    /// Process one line of player input.
    ///
    /// Routing rules apply in priority order: a finished game swallows
    /// everything; an armed pending action consumes the whole line as its
    /// target; the first gameplay input names the player; the screensaver
    /// literal short-circuits before the echo; mid-dialogue only an answer
    /// is accepted. Whatever remains goes through the action table, and a
    /// turn that ends with no dialogue or pending action hands the
    /// adversary its move.
    pub fn process_command(&mut self, raw: &str) {
        if self.state().game_over {
            return;
        }

        if let Some(pending) = self.state().pending_action.clone() {
            self.resolve_pending(pending, raw);
            return;
        }

        if self.state().view == GameView::Gameplay && self.state().player_name == PENDING_NAME {
            self.set_player_name(raw);
            return;
        }

        if raw.trim().eq_ignore_ascii_case(SCREENSAVER_LITERAL) {
            self.requests.push(HostRequest::Screensaver);
            return;
        }

        self.store.push_line(format!("> {raw}"), LogStyle::Player);

        let normalized = normalize(raw);
        let mut parts = normalized.split_whitespace();
        let action_word = parts.next().unwrap_or("").to_string();
        let argument = parts.collect::<Vec<_>>().join(" ");

        let action = self.catalog.commands.get(&action_word).copied();

        if self.state().active_dialogue.is_some() && action != Some(CommandAction::Answer) {
            let line = self.catalog.strings.get("system.answer_required");
            self.store.push_line(line, LogStyle::System);
            return;
        }

        match action {
            Some(CommandAction::NewGame) => self.start_opening(),
            Some(CommandAction::Help) => {
                let line = self.catalog.strings.get("system.help");
                self.store.push_line(line, LogStyle::Positive);
            }
            Some(CommandAction::ListContacts) => self.list_contacts(),
            Some(CommandAction::ListFragments) => self.list_fragments(),
            Some(CommandAction::ListInventory) => self.list_inventory(),
            Some(CommandAction::Talk) => self.start_dialogue(&argument),
            Some(CommandAction::Answer) => self.answer(raw),
            Some(CommandAction::Save) => self.export_save(),
            Some(CommandAction::Load) => self.requests.push(HostRequest::PickSaveFile),
            Some(CommandAction::OpenSettings) => self.open_settings(),
            Some(CommandAction::UseItem) => self.use_item(&argument),
            Some(CommandAction::ExitToMenu) => self.reset_game(),
            None => {
                let line = self
                    .catalog
                    .strings
                    .format("system.invalid_command", &[&action_word]);
                self.store.push_line(line, LogStyle::Negative);
                self.play(SoundCue::Sfx(SoundEffect::Corruption));
            }
        }

        if self.state().active_dialogue.is_none() && self.state().pending_action.is_none() {
            self.adversary_tick();
        }
    }

    fn list_contacts(&mut self) {
        let header = self.catalog.strings.get("system.contacts_header");
        self.store.push_line(header, LogStyle::System);

        let contacts: Vec<_> = self
            .state()
            .active_characters
            .iter()
            .map(|(id, record)| (id.clone(), record.trust, record.log_style()))
            .collect();
        for (id, trust, style) in contacts {
            let line = self.catalog.strings.format(
                "system.contact_entry",
                &[&id.to_uppercase(), &format!("{trust:.0}")],
            );
            self.store.push_line(line, style);
        }
    }

    fn list_fragments(&mut self) {
        let header = self.catalog.strings.get("system.fragments_header");
        self.store.push_line(header, LogStyle::System);

        if self.state().key_fragments.is_empty() {
            let line = self.catalog.strings.get("system.fragments_none");
            self.store.push_line(line, LogStyle::System);
            return;
        }

        let fragments: Vec<_> = self.state().key_fragments.iter().cloned().collect();
        for fragment in fragments {
            let line = self
                .catalog
                .strings
                .format("system.fragment_entry", &[&fragment]);
            self.store.push_line(line, LogStyle::Positive);
        }
    }

    fn list_inventory(&mut self) {
        let header = self.catalog.strings.get("system.inventory_header");
        self.store.push_line(header, LogStyle::System);

        let owned: Vec<_> = self
            .state()
            .inventory
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, count)| (id.clone(), *count))
            .collect();

        if owned.is_empty() {
            let line = self.catalog.strings.get("system.inventory_none");
            self.store.push_line(line, LogStyle::System);
            return;
        }

        for (id, count) in owned {
            let Some(item) = self.catalog.items.get(&id).cloned() else {
                tracing::warn!(item = %id, "inventory holds an item missing from the catalog");
                continue;
            };
            let line = self.catalog.strings.format(
                "system.inventory_entry",
                &[&item.name, &count.to_string(), &item.description],
            );
            self.store.push_line(line, LogStyle::Positive);
        }
    }
}

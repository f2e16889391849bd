//! Shared fixtures for the engine integration suites.

use std::collections::BTreeMap;

use grid_rules::{
    AdLibLine, CharacterKind, CharacterTemplate, CommandAction, ContentCatalog, DialogueNode,
    DialogueOption, DialogueSet, EngineConfig, GameState, IceConfig, ItemDef, ItemEffect,
    PhaseDef, StringTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terminal_core::{Engine, SaveDocument};

fn ad_lib(effect: f32) -> DialogueSet {
    DialogueSet::AdLib {
        openers: vec!["Link up.".to_string()],
        player_lines: vec![AdLibLine {
            text: "Heard anything?".to_string(),
            trust_effect: effect,
        }],
        closers: vec!["Stay sharp.".to_string()],
    }
}

fn tree(nodes: Vec<(&str, DialogueNode)>) -> DialogueSet {
    DialogueSet::Tree {
        nodes: nodes
            .into_iter()
            .map(|(key, node)| (key.to_string(), node))
            .collect(),
    }
}

fn template(kind: CharacterKind, trust: f32, dialogue: DialogueSet) -> CharacterTemplate {
    CharacterTemplate {
        kind,
        trust,
        dialogue,
    }
}

/// A three-phase world with every character kind represented.
pub fn catalog() -> ContentCatalog {
    let mut characters = BTreeMap::new();
    characters.insert(
        "oracle".to_string(),
        template(
            CharacterKind::Guide,
            0.0,
            tree(vec![(
                "phase_1_start",
                DialogueNode {
                    text: "Two contacts in this sector need turning.".to_string(),
                    options: vec![DialogueOption {
                        text: "Understood.".to_string(),
                        ..Default::default()
                    }],
                },
            )]),
        ),
    );
    characters.insert(
        "vesper".to_string(),
        template(CharacterKind::Neutral, 50.0, ad_lib(10.0)),
    );
    characters.insert(
        "mirage".to_string(),
        template(CharacterKind::Neutral, 40.0, ad_lib(5.0)),
    );
    characters.insert(
        "cipher".to_string(),
        template(CharacterKind::Adversary, 0.0, tree(vec![])),
    );
    characters.insert(
        "broker".to_string(),
        template(
            CharacterKind::Leader,
            0.0,
            tree(vec![(
                "initial",
                DialogueNode {
                    text: "What do you want?".to_string(),
                    options: vec![
                        DialogueOption {
                            text: "Information.".to_string(),
                            ..Default::default()
                        },
                        DialogueOption {
                            text: "Everything.".to_string(),
                            ..Default::default()
                        },
                    ],
                },
            )]),
        ),
    );
    characters.insert(
        "warden".to_string(),
        template(
            CharacterKind::Leader,
            0.0,
            tree(vec![(
                "initial",
                DialogueNode {
                    text: "Take the fragment and move on.".to_string(),
                    options: vec![DialogueOption {
                        text: "Thank you.".to_string(),
                        grants_fragment: Some("sector-key".to_string()),
                        ..Default::default()
                    }],
                },
            )]),
        ),
    );
    characters.insert(
        "nexus".to_string(),
        template(
            CharacterKind::Sage,
            0.0,
            tree(vec![(
                "initial",
                DialogueNode {
                    text: "The mainframe listens.".to_string(),
                    options: vec![],
                },
            )]),
        ),
    );

    let mut items = BTreeMap::new();
    items.insert(
        "ping_sweep".to_string(),
        ItemDef {
            name: "Ping Sweep".to_string(),
            description: "Maps the local sector.".to_string(),
            effect: ItemEffect::SectorPing {
                influence_gain: 5.0,
            },
        },
    );
    items.insert(
        "rootkit".to_string(),
        ItemDef {
            name: "Rootkit".to_string(),
            description: "Full access override.".to_string(),
            effect: ItemEffect::RootkitOverride,
        },
    );
    items.insert(
        "modulator".to_string(),
        ItemDef {
            name: "Signal Modulator".to_string(),
            description: "Obscures your signature.".to_string(),
            effect: ItemEffect::ModulatorToggle,
        },
    );
    items.insert(
        "firewall_breaker".to_string(),
        ItemDef {
            name: "Firewall Breaker".to_string(),
            description: "Repels ICE tracking.".to_string(),
            effect: ItemEffect::FirewallToggle,
        },
    );

    let commands = [
        ("new", CommandAction::NewGame),
        ("help", CommandAction::Help),
        ("online", CommandAction::ListContacts),
        ("keys", CommandAction::ListFragments),
        ("inventory", CommandAction::ListInventory),
        ("talk", CommandAction::Talk),
        ("answer", CommandAction::Answer),
        ("save", CommandAction::Save),
        ("load", CommandAction::Load),
        ("settings", CommandAction::OpenSettings),
        ("use", CommandAction::UseItem),
        ("exit", CommandAction::ExitToMenu),
    ]
    .into_iter()
    .map(|(word, action)| (word.to_string(), action))
    .collect();

    ContentCatalog {
        phases: vec![
            PhaseDef {
                number: 1,
                required_conversions: Some(2),
                initial_active: vec![
                    "oracle".to_string(),
                    "vesper".to_string(),
                    "mirage".to_string(),
                    "cipher".to_string(),
                    "broker".to_string(),
                ],
                leader: Some("warden".to_string()),
                ..Default::default()
            },
            PhaseDef {
                number: 2,
                required_conversions: Some(1),
                ..Default::default()
            },
            PhaseDef {
                number: 3,
                required_conversions: Some(1),
                leader: Some("warden".to_string()),
                ..Default::default()
            },
        ],
        characters,
        items,
        commands,
        config: EngineConfig {
            ice: IceConfig {
                enabled: true,
                attack_chance: 0.0,
            },
            final_phase: 6,
            guide_id: "oracle".to_string(),
        },
        strings: StringTable::from_pairs([
            ("system.contact_entry", "- {0} (Trust: {1}%)"),
            ("influence.report", "[INFLUENCE]: {0}% | {1}: {2}%"),
        ]),
        ..Default::default()
    }
}

/// Engine booted into gameplay with the phase 1 roster online.
pub fn boot(catalog: ContentCatalog) -> Engine {
    let mut engine = Engine::with_rng(catalog, StdRng::seed_from_u64(7));
    engine.begin_gameplay();
    engine.process_command("echo");
    engine.take_sounds();
    engine.take_requests();
    engine.take_scheduled();
    engine
}

/// Engine dropped straight into an arbitrary state via a save document.
/// The roster reconciliation applies, so anything that must survive needs
/// to be reachable from the phase table.
pub fn boot_with_state(catalog: ContentCatalog, state: GameState) -> Engine {
    let mut engine = Engine::with_rng(catalog, StdRng::seed_from_u64(7));
    let document = SaveDocument {
        state,
        recent_log: Vec::new(),
    };
    let json = serde_json::to_string(&document).expect("save document serializes");
    engine.load_save(&json).expect("crafted save loads");
    engine.take_sounds();
    engine.take_requests();
    engine.take_scheduled();
    engine
}

/// A gameplay-shaped state with the pool stamped from `catalog`.
pub fn gameplay_state(catalog: &ContentCatalog) -> GameState {
    let mut state = GameState::initial();
    state.view = grid_rules::GameView::Gameplay;
    state.player_name = "ECHO".to_string();
    state.all_characters_pool = catalog.instantiate_pool();
    state.active_characters = state.all_characters_pool.clone();
    state
}

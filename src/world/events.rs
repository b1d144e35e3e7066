//! World events and their effect on the meters.

use serde::{Deserialize, Serialize};

use super::meters::{MeterName, Meters};
use crate::core::error::DeckResult;

/// A signed change to one meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterEffect {
    pub meter: MeterName,
    pub change: i32,
}

impl MeterEffect {
    pub fn new(meter: MeterName, change: i32) -> Self {
        Self { meter, change }
    }
}

/// A world event a GM can select.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<MeterEffect>,
}

impl WorldEvent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_effect(mut self, meter: MeterName, change: i32) -> Self {
        self.effects.push(MeterEffect::new(meter, change));
        self
    }
}

/// Load events from a JSON array.
pub fn events_from_json(json: &str) -> DeckResult<Vec<WorldEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// The five standard world events.
#[must_use]
pub fn builtin_events() -> Vec<WorldEvent> {
    vec![
        WorldEvent::new("missing", "The Missing")
            .with_description(
                "1% of the global population disappeared one day. No explanation. \
                 No Answers. They have never been found or detected.",
            )
            .with_effect(MeterName::Surveillance, 1),
        WorldEvent::new("broken-keystone", "Broken Keystone")
            .with_description(
                "Many Keystone Species have gone extinct irrevocably changing the \
                 amount and types of food available.",
            )
            .with_effect(MeterName::Collapse, 1),
        WorldEvent::new("bifurcation", "The Bifurcation")
            .with_description(
                "Society has stratified into the haves and the have nots. Those below \
                 are just that. Literally and Philosophically below. The powerful have \
                 the money, weapons, influence, and power.",
            )
            .with_effect(MeterName::CarteBlanche, 1),
        WorldEvent::new("doubling", "Doubling")
            .with_description(
                "People around the world have been replaced with Automotons that look, \
                 act, and live normally. No one agrees on what created the doubles. \
                 Some accept, some eliminate perceived perpetrators.",
            )
            .with_effect(MeterName::Distrust, 1),
        WorldEvent::new("brave-new-world", "Brave New World")
            .with_description(
                "Media, Entertainment, Influencers, Government, Corporations, and Gangs \
                 inundate the world with experiences, goods, and services. The Show MUST \
                 Go On!",
            )
            .with_effect(MeterName::Trust, 1),
    ]
}

/// Sum the effects of the selected events onto zeroed meters.
///
/// Unknown ids are ignored. An id selected twice counts twice.
#[must_use]
pub fn apply_event_effects<S: AsRef<str>>(selected: &[S], events: &[WorldEvent]) -> Meters {
    let mut meters = Meters::zeroed();
    for id in selected {
        let Some(event) = events.iter().find(|e| e.id == id.as_ref()) else {
            continue;
        };
        for effect in &event.effects {
            meters.apply(effect.meter, effect.change);
        }
    }
    meters
}

/// Add `id` to the selection, or remove it if already selected.
pub fn toggle_selection(selected: &mut Vec<String>, id: &str) {
    if selected.iter().any(|s| s == id) {
        selected.retain(|s| s != id);
    } else {
        selected.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_events() {
        let events = builtin_events();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.effects.len() == 1));
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["missing", "broken-keystone", "bifurcation", "doubling", "brave-new-world"]);
    }

    #[test]
    fn test_apply_event_effects() {
        let events = builtin_events();
        let meters = apply_event_effects(&["missing", "doubling", "unknown"], &events);
        assert_eq!(meters.surveillance, 1);
        assert_eq!(meters.distrust, 1);
        assert_eq!(meters.trust, 0);

        let none: [&str; 0] = [];
        assert_eq!(apply_event_effects(&none, &events), Meters::zeroed());
    }

    #[test]
    fn test_effects_stack_and_go_negative() {
        let events = vec![
            WorldEvent::new("a", "A").with_effect(MeterName::Record, 2),
            WorldEvent::new("b", "B")
                .with_effect(MeterName::Record, -3)
                .with_effect(MeterName::Influence, 1),
        ];
        let meters = apply_event_effects(&["a", "b"], &events);
        assert_eq!(meters.record, -1);
        assert_eq!(meters.influence, 1);
    }

    #[test]
    fn test_toggle_selection() {
        let mut selected = Vec::new();
        toggle_selection(&mut selected, "missing");
        toggle_selection(&mut selected, "doubling");
        assert_eq!(selected, vec!["missing", "doubling"]);

        toggle_selection(&mut selected, "missing");
        assert_eq!(selected, vec!["doubling"]);
    }

    #[test]
    fn test_events_from_json() {
        let json = r#"[{"id": "x", "name": "X", "effects": [{"meter": "carteBlanche", "change": -1}]}]"#;
        let events = events_from_json(json).unwrap();
        assert_eq!(events[0].effects[0], MeterEffect::new(MeterName::CarteBlanche, -1));
        assert_eq!(events[0].description, "");

        assert!(events_from_json(r#"[{"id": "x", "name": "X", "effects": [{"meter": "mood", "change": 1}]}]"#).is_err());
    }
}

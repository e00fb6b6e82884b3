//! Bar layout types

use std::fmt;

use super::module::ModuleSpec;

/// Which bar a module belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarId {
    Top,
    Bottom,
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// Fixed position of one module's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub bar: BarId,
    pub position: usize,
}

impl SlotId {
    pub fn new(bar: BarId, position: usize) -> Self {
        Self { bar, position }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.bar, self.position)
    }
}

/// Strings wrapped around and placed between module outputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarStyle {
    pub prefix: String,
    pub suffix: String,
    pub delimiter: String,
}

/// One bar: its style and its ordered modules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarSpec {
    pub style: BarStyle,
    pub modules: Vec<ModuleSpec>,
}

/// Validated, immutable layout of every bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarLayout {
    pub top: BarSpec,
    pub bottom: Option<BarSpec>,

    /// Placed between the top and bottom bar text
    pub separator: String,

    /// Maximum characters kept from a module's output
    pub output_cap: usize,
}

impl BarLayout {
    /// Every module paired with its slot, top bar first
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &ModuleSpec)> {
        let top = self
            .top
            .modules
            .iter()
            .enumerate()
            .map(|(i, m)| (SlotId::new(BarId::Top, i), m));
        let bottom = self
            .bottom
            .iter()
            .flat_map(|b| b.modules.iter().enumerate())
            .map(|(i, m)| (SlotId::new(BarId::Bottom, i), m));
        top.chain(bottom)
    }

    pub fn module_count(&self) -> usize {
        self.top.modules.len() + self.bottom.as_ref().map_or(0, |b| b.modules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProducerSpec;

    fn module(name: &str) -> ModuleSpec {
        ModuleSpec {
            name: name.to_string(),
            producer: ProducerSpec::Text(name.to_string()),
            interval_secs: 5,
            trigger: None,
        }
    }

    #[test]
    fn test_slots_cover_both_bars_in_order() {
        let layout = BarLayout {
            top: BarSpec {
                style: BarStyle::default(),
                modules: vec![module("a"), module("b")],
            },
            bottom: Some(BarSpec {
                style: BarStyle::default(),
                modules: vec![module("c")],
            }),
            separator: ";".to_string(),
            output_cap: 500,
        };

        let slots: Vec<_> = layout.slots().map(|(slot, m)| (slot, m.name.clone())).collect();
        assert_eq!(
            slots,
            vec![
                (SlotId::new(BarId::Top, 0), "a".to_string()),
                (SlotId::new(BarId::Top, 1), "b".to_string()),
                (SlotId::new(BarId::Bottom, 0), "c".to_string()),
            ]
        );
        assert_eq!(layout.module_count(), 3);
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(SlotId::new(BarId::Bottom, 2).to_string(), "bottom[2]");
    }
}

//! Item descriptors and the bound items that panes own.

use std::collections::BTreeSet;
use std::fmt;

use crate::binding::ClickAction;
use crate::event::ClickEvent;

/// Canonical (upper-case, underscore separated) item type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Material(String);

impl Material {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical spelling of a user supplied id: namespace stripped,
    /// upper-cased, spaces and dashes folded into underscores.
    pub fn normalize(id: &str) -> String {
        let trimmed = id.trim();
        let bare = trimmed
            .get(..10)
            .filter(|prefix| prefix.eq_ignore_ascii_case("minecraft:"))
            .map_or(trimmed, |_| &trimmed[10..]);
        bare.chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const DEFAULT_MATERIALS: &[&str] = &[
    "AIR",
    "APPLE",
    "ARROW",
    "BARRIER",
    "BEDROCK",
    "BLACK_STAINED_GLASS_PANE",
    "BONE",
    "BOOK",
    "BOW",
    "BREAD",
    "CHEST",
    "CLOCK",
    "COAL",
    "COBBLESTONE",
    "COMPASS",
    "COOKED_BEEF",
    "DIAMOND",
    "DIAMOND_SWORD",
    "DIRT",
    "EMERALD",
    "ENDER_PEARL",
    "FEATHER",
    "GLASS",
    "GLASS_PANE",
    "GOLD_INGOT",
    "GRASS_BLOCK",
    "GRAY_STAINED_GLASS_PANE",
    "GREEN_WOOL",
    "IRON_INGOT",
    "IRON_SWORD",
    "LAVA_BUCKET",
    "MAP",
    "NAME_TAG",
    "OAK_LOG",
    "OAK_PLANKS",
    "PAPER",
    "PLAYER_HEAD",
    "REDSTONE",
    "RED_WOOL",
    "SAND",
    "SIGN",
    "STAINED_GLASS_PANE",
    "STICK",
    "STONE",
    "TNT",
    "TORCH",
    "WATER_BUCKET",
    "WHITE_WOOL",
    "WOOL",
    "WRITABLE_BOOK",
];

/// Set of item type identifiers the loader accepts.
#[derive(Debug, Clone)]
pub struct MaterialRegistry {
    known: BTreeSet<String>,
}

impl MaterialRegistry {
    pub fn empty() -> Self {
        Self {
            known: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, id: &str) -> Material {
        let name = Material::normalize(id);
        self.known.insert(name.clone());
        Material(name)
    }

    /// Resolve an id case-insensitively.
    pub fn resolve(&self, id: &str) -> Option<Material> {
        let name = Material::normalize(id);
        self.known.contains(&name).then_some(Material(name))
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for id in DEFAULT_MATERIALS {
            registry.insert(id);
        }
        registry
    }
}

/// Renderable item descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    material: Material,
    amount: u8,
    damage: i16,
    display_name: Option<String>,
    lore: Vec<String>,
}

impl ItemStack {
    pub fn new(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            damage: 0,
            display_name: None,
            lore: Vec::new(),
        }
    }

    pub fn with_amount(mut self, amount: u8) -> Self {
        self.amount = amount.max(1);
        self
    }

    pub fn with_damage(mut self, damage: i16) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_lore(mut self, lore: Vec<String>) -> Self {
        self.lore = lore;
        self
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn amount(&self) -> u8 {
        self.amount
    }

    pub fn damage(&self) -> i16 {
        self.damage
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn lore(&self) -> &[String] {
        &self.lore
    }

    /// Short label for previews: the display name when set, else the material.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.material.as_str())
    }
}

/// An item placed in a pane, with an optional lookup tag and click action.
#[derive(Debug, Clone)]
pub struct BoundItem {
    stack: ItemStack,
    tag: Option<String>,
    action: Option<ClickAction>,
}

impl BoundItem {
    pub fn new(stack: ItemStack) -> Self {
        Self {
            stack,
            tag: None,
            action: None,
        }
    }

    pub fn with_action(mut self, action: ClickAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn stack(&self) -> &ItemStack {
        &self.stack
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    pub fn action(&self) -> Option<&ClickAction> {
        self.action.as_ref()
    }

    pub fn set_action(&mut self, action: Option<ClickAction>) {
        self.action = action;
    }

    /// Run the click action, if any. Handler failures are logged by the
    /// action itself and never reach the caller.
    pub fn click(&self, event: &mut ClickEvent) {
        if let Some(action) = &self.action {
            action.invoke(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_case_insensitive_and_namespace_aware() {
        let registry = MaterialRegistry::default();
        let stone = registry.resolve("stone").unwrap();
        assert_eq!(stone.as_str(), "STONE");
        assert_eq!(registry.resolve("Minecraft:Diamond_Sword"), registry.resolve("DIAMOND_SWORD"));
        assert_eq!(registry.resolve("grass block").unwrap().as_str(), "GRASS_BLOCK");
        assert!(registry.resolve("unobtainium").is_none());
    }

    #[test]
    fn custom_materials_can_be_registered() {
        let mut registry = MaterialRegistry::empty();
        assert!(registry.is_empty());
        registry.insert("ruby");
        assert_eq!(registry.resolve("RUBY").unwrap().to_string(), "RUBY");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn label_prefers_display_name() {
        let registry = MaterialRegistry::default();
        let plain = ItemStack::new(registry.resolve("paper").unwrap());
        assert_eq!(plain.label(), "PAPER");
        let named = plain.clone().with_display_name("Next");
        assert_eq!(named.label(), "Next");
        assert_eq!(named.amount(), 1);
        assert_eq!(named.damage(), 0);
    }

    #[test]
    fn bound_item_without_action_ignores_clicks() {
        let registry = MaterialRegistry::default();
        let item = BoundItem::new(ItemStack::new(registry.resolve("stone").unwrap())).with_tag("s");
        let mut event = ClickEvent::new(0).unwrap();
        item.click(&mut event);
        assert_eq!(item.tag(), Some("s"));
        assert!(item.action().is_none());
    }
}

//! Consumables and scrolls
//!
//! Entry points an inventory screen calls into. Every effect is
//! check-then-act: a rejected use changes nothing and returns false.

use super::combat::{self, Spell};
use super::state::{GameEvent, GamePhase, GameState};

pub const HEALTH_POTION_HEAL: f32 = 50.0;
pub const MANA_POTION_RESTORE: f32 = 30.0;

fn can_use(state: &GameState) -> bool {
    !matches!(state.session.phase, GamePhase::PlayerDead | GamePhase::Victory)
        && !state.player.is_dead()
}

fn item_event(state: &mut GameState, text: impl Into<String>) {
    state.emit(GameEvent::ItemUsed {
        pos: state.player.body.pos,
        text: text.into(),
    });
}

/// Restore health (capped at max). Rejected at full health or when dead.
pub fn apply_heal(state: &mut GameState, amount: f32) -> bool {
    if !can_use(state) || amount <= 0.0 || state.player.health >= state.player.max_health {
        log::debug!("Heal of {} rejected", amount);
        return false;
    }
    state.player.heal(amount);
    true
}

/// Restore mana (capped at max). Rejected when already full.
pub fn apply_resource_restore(state: &mut GameState, amount: f32) -> bool {
    if !can_use(state) || amount <= 0.0 || state.player.mana >= state.player.max_mana {
        log::debug!("Mana restore of {} rejected", amount);
        return false;
    }
    state.player.restore_mana(amount);
    true
}

/// Cast a spell by id or scroll name. Only while a level is being played.
pub fn cast_by_name(state: &mut GameState, spell_id: &str) -> bool {
    if state.session.phase != GamePhase::Playing {
        log::debug!("Cast of {:?} ignored in {:?}", spell_id, state.session.phase);
        return false;
    }
    let Some(spell) = Spell::from_name(spell_id) else {
        log::debug!("Unknown spell {:?}", spell_id);
        return false;
    };
    combat::cast_spell(state, spell)
}

/// Use an inventory item by display name
pub fn use_item(state: &mut GameState, name: &str) -> bool {
    let used = if name.contains("Health Potion") {
        apply_heal(state, HEALTH_POTION_HEAL).then_some("Health restored!".to_string())
    } else if name.contains("Mana Potion") {
        apply_resource_restore(state, MANA_POTION_RESTORE).then_some("Mana restored!".to_string())
    } else if name.contains("Strength Potion") {
        can_use(state).then_some("Strength boosted!".to_string())
    } else if name.contains("Scroll") {
        cast_by_name(state, name).then(|| format!("Used: {}", name))
    } else {
        log::debug!("Unknown item {:?}", name);
        None
    };

    match used {
        Some(text) => {
            log::info!("Used item {}", name);
            item_event(state, text);
            true
        }
        None => false,
    }
}

/// Drink one of the player's own potions
pub fn drink_potion(state: &mut GameState) -> bool {
    if state.player.potions == 0 {
        return false;
    }
    let amount = state.tuning.potion_heal;
    if !apply_heal(state, amount) {
        return false;
    }
    state.player.potions -= 1;
    item_event(state, format!("+{:.0} HP", amount));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EventCategory;

    fn playing() -> GameState {
        let mut state = GameState::new(2);
        state.session.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_health_potion_caps_at_max() {
        let mut state = playing();
        state.player.health = 70.0;
        assert!(use_item(&mut state, "Health Potion"));
        assert_eq!(state.player.health, 100.0);

        let event = state.events.last().unwrap();
        assert_eq!(event.category(), EventCategory::Item);
        assert_eq!(event.text(), "Health restored!");
    }

    #[test]
    fn test_heal_rejected_at_full_health() {
        let mut state = playing();
        assert!(!use_item(&mut state, "Health Potion"));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_mana_potion() {
        let mut state = playing();
        state.player.mana = 5.0;
        assert!(use_item(&mut state, "Mana Potion"));
        assert_eq!(state.player.mana, 35.0);
    }

    #[test]
    fn test_strength_potion_only_announces() {
        let mut state = playing();
        assert!(use_item(&mut state, "Strength Potion"));
        assert_eq!(state.events.last().unwrap().text(), "Strength boosted!");
        assert_eq!(state.player.health, 100.0);
    }

    #[test]
    fn test_scrolls_cast_spells() {
        let mut state = playing();
        assert!(use_item(&mut state, "Ice Scroll"));
        assert_eq!(state.projectiles.len(), 3);
        // Scrolls are free
        assert_eq!(state.player.mana, 50.0);
        assert_eq!(state.events.last().unwrap().text(), "Used: Ice Scroll");
    }

    #[test]
    fn test_scroll_outside_level_rejected() {
        let mut state = GameState::new(2);
        assert!(!use_item(&mut state, "Fire Scroll"));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut state = playing();
        assert!(!use_item(&mut state, "Rusty Sword"));
        assert!(!cast_by_name(&mut state, "meteor"));
        // "Justice" is not an ice spell
        assert!(!use_item(&mut state, "Scroll of Justice"));
        assert!(state.projectiles.is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_no_healing_the_dead() {
        let mut state = playing();
        state.player.health = 0.0;
        state.session.phase = GamePhase::PlayerDead;
        assert!(!apply_heal(&mut state, 50.0));
        assert_eq!(state.player.health, 0.0);
    }

    #[test]
    fn test_drink_potion_is_check_then_act() {
        let mut state = playing();
        // Full health: potion kept
        assert!(!drink_potion(&mut state));
        assert_eq!(state.player.potions, 3);

        state.player.health = 50.0;
        assert!(drink_potion(&mut state));
        assert_eq!(state.player.health, 80.0);
        assert_eq!(state.player.potions, 2);

        state.player.potions = 0;
        state.player.health = 10.0;
        assert!(!drink_potion(&mut state));
        assert_eq!(state.player.health, 10.0);
    }
}

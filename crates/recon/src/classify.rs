use crate::config::{TargetRule, SLOT_COUNT};
use crate::model::TargetReason;

/// Decide whether an applicant needs provisioning.
///
/// An unregistered match always selects the row. Otherwise the row is
/// selected when the email is absent from every slot the rule lists.
pub fn classify_target(
    slot_presence: &[bool; SLOT_COUNT],
    in_unregistered: bool,
    rule: &TargetRule,
) -> Option<TargetReason> {
    if in_unregistered {
        return Some(TargetReason::Unregistered);
    }

    let holds_listed_role = rule
        .absent_slots
        .iter()
        .any(|&slot| slot_presence.get(slot).copied().unwrap_or(false));

    if holds_listed_role {
        None
    } else {
        Some(TargetReason::NoListedRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> TargetRule {
        TargetRule::default()
    }

    #[test]
    fn unregistered_always_targets() {
        let all = [true; SLOT_COUNT];
        assert_eq!(classify_target(&all, true, &rule()), Some(TargetReason::Unregistered));
    }

    #[test]
    fn unregistered_reported_over_missing_roles() {
        let none = [false; SLOT_COUNT];
        assert_eq!(classify_target(&none, true, &rule()), Some(TargetReason::Unregistered));
    }

    #[test]
    fn absent_from_both_listed_slots_targets() {
        let presence = [true, false, true, false];
        assert_eq!(classify_target(&presence, false, &rule()), Some(TargetReason::NoListedRole));
    }

    #[test]
    fn present_in_either_listed_slot_is_not_a_target() {
        assert_eq!(classify_target(&[false, true, false, false], false, &rule()), None);
        assert_eq!(classify_target(&[false, false, false, true], false, &rule()), None);
    }

    #[test]
    fn rule_positions_are_configurable() {
        let only_first = TargetRule { absent_slots: vec![0] };
        assert_eq!(classify_target(&[true, false, false, false], false, &only_first), None);
        assert_eq!(
            classify_target(&[false, true, true, true], false, &only_first),
            Some(TargetReason::NoListedRole)
        );
    }
}

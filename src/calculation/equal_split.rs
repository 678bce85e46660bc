//! Equal split calculation.
//!
//! Every member pays `floor(total / N)` to the cent. The leftover cents go
//! one each to the first members in the order they were supplied, so the
//! same member order always produces the same amounts.

use rust_decimal::Decimal;

use crate::models::{Amount, AuditStep, CalculatedSplit, round_half_up};

use super::SplitCalculation;

/// Splits a total equally among the given members.
///
/// The display percentage reported for every member is `100 / N`
/// rounded to 2 places.
///
/// # Arguments
///
/// * `total` - The expense total
/// * `member_ids` - The members to split among, in request order
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::calculate_equal_split;
/// use trip_ledger::models::Amount;
/// use std::str::FromStr;
///
/// let members = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let result = calculate_equal_split(Amount::from_str("100.00").unwrap(), &members, 1);
///
/// assert_eq!(result.splits[0].amount.to_string(), "33.34");
/// assert_eq!(result.splits[1].amount.to_string(), "33.33");
/// assert_eq!(result.splits[2].amount.to_string(), "33.33");
/// ```
pub fn calculate_equal_split(
    total: Amount,
    member_ids: &[String],
    step_number: u32,
) -> SplitCalculation {
    if member_ids.is_empty() {
        return SplitCalculation {
            splits: vec![],
            audit_step: AuditStep {
                step_number,
                rule_id: "equal_split".to_string(),
                rule_name: "Equal Split".to_string(),
                input: serde_json::json!({
                    "total": total.to_string(),
                    "members": 0
                }),
                output: serde_json::json!({ "splits": 0 }),
                reasoning: "No members to split among".to_string(),
            },
        };
    }

    let member_count = member_ids.len() as i128;
    let base_cents = total.cents().div_euclid(member_count);
    let remainder_cents = total.cents() - base_cents * member_count;
    let base = Amount::from_cents(base_cents);
    let percentage = round_half_up(
        Decimal::ONE_HUNDRED / Decimal::from(member_ids.len() as u64),
        2,
    );

    let splits = member_ids
        .iter()
        .enumerate()
        .map(|(index, user_id)| {
            let amount = if (index as i128) < remainder_cents {
                base + Amount::CENT
            } else {
                base
            };
            CalculatedSplit {
                user_id: user_id.clone(),
                amount,
                percentage: Some(percentage),
                shares: None,
            }
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "equal_split".to_string(),
        rule_name: "Equal Split".to_string(),
        input: serde_json::json!({
            "total": total.to_string(),
            "members": member_ids.len()
        }),
        output: serde_json::json!({
            "base": base.to_string(),
            "remainder_cents": remainder_cents as i64,
            "percentage": percentage.to_string()
        }),
        reasoning: format!(
            "${} / {} = ${} each, first {} member(s) receive one extra cent",
            total,
            member_ids.len(),
            base,
            remainder_cents
        ),
    };

    SplitCalculation { splits, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// $100.00 among three: the first member absorbs the extra cent
    #[test]
    fn test_hundred_among_three() {
        let result = calculate_equal_split(amt("100.00"), &ids(&["A", "B", "C"]), 1);

        assert_eq!(result.splits[0].user_id, "A");
        assert_eq!(result.splits[0].amount, amt("33.34"));
        assert_eq!(result.splits[1].amount, amt("33.33"));
        assert_eq!(result.splits[2].amount, amt("33.33"));
        assert_eq!(result.total(), amt("100.00"));
    }

    #[test]
    fn test_even_division_has_no_remainder() {
        let result = calculate_equal_split(amt("90.00"), &ids(&["A", "B", "C"]), 1);

        assert!(result.splits.iter().all(|s| s.amount == amt("30.00")));
        assert_eq!(result.audit_step.output["remainder_cents"], 0);
    }

    #[test]
    fn test_several_leftover_cents_go_to_first_members() {
        // 10.03 / 4 = 2.5075 -> base 2.50, 3 leftover cents
        let result = calculate_equal_split(amt("10.03"), &ids(&["A", "B", "C", "D"]), 1);

        let amounts: Vec<Amount> = result.splits.iter().map(|s| s.amount).collect();
        assert_eq!(
            amounts,
            vec![amt("2.51"), amt("2.51"), amt("2.51"), amt("2.50")]
        );
        assert_eq!(result.total(), amt("10.03"));
    }

    #[test]
    fn test_base_is_floored_not_rounded() {
        // 0.05 / 3 = 0.0166.. rounds to 0.02 but must floor to 0.01
        let result = calculate_equal_split(amt("0.05"), &ids(&["A", "B", "C"]), 1);

        let amounts: Vec<Amount> = result.splits.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![amt("0.02"), amt("0.02"), amt("0.01")]);
        assert_eq!(result.total(), amt("0.05"));
    }

    #[test]
    fn test_total_smaller_than_member_count() {
        let result = calculate_equal_split(amt("0.02"), &ids(&["A", "B", "C"]), 1);

        let amounts: Vec<Amount> = result.splits.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![amt("0.01"), amt("0.01"), amt("0.00")]);
    }

    #[test]
    fn test_member_order_decides_who_gets_extra_cent() {
        let forward = calculate_equal_split(amt("100.00"), &ids(&["A", "B", "C"]), 1);
        let reversed = calculate_equal_split(amt("100.00"), &ids(&["C", "B", "A"]), 1);

        assert_eq!(forward.splits[0].user_id, "A");
        assert_eq!(forward.splits[0].amount, amt("33.34"));
        assert_eq!(reversed.splits[0].user_id, "C");
        assert_eq!(reversed.splits[0].amount, amt("33.34"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let members = ids(&["A", "B", "C", "D", "E", "F", "G"]);
        let first = calculate_equal_split(amt("123.45"), &members, 1);
        let second = calculate_equal_split(amt("123.45"), &members, 1);

        assert_eq!(first, second);
    }

    #[test]
    fn test_display_percentage_is_rounded() {
        let result = calculate_equal_split(amt("100.00"), &ids(&["A", "B", "C"]), 1);

        assert!(
            result
                .splits
                .iter()
                .all(|s| s.percentage == Some(dec("33.33")))
        );
        assert!(result.splits.iter().all(|s| s.shares.is_none()));
    }

    #[test]
    fn test_display_percentage_rounds_half_up() {
        // 100 / 8 = 12.5 exactly, 100 / 6 = 16.666.. -> 16.67
        let eight = calculate_equal_split(amt("8.00"), &ids(&["1", "2", "3", "4", "5", "6", "7", "8"]), 1);
        assert_eq!(eight.splits[0].percentage, Some(dec("12.5")));

        let six = calculate_equal_split(amt("6.00"), &ids(&["1", "2", "3", "4", "5", "6"]), 1);
        assert_eq!(six.splits[0].percentage, Some(dec("16.67")));
    }

    #[test]
    fn test_single_member_pays_everything() {
        let result = calculate_equal_split(amt("42.42"), &ids(&["solo"]), 1);

        assert_eq!(result.splits.len(), 1);
        assert_eq!(result.splits[0].amount, amt("42.42"));
        assert_eq!(result.splits[0].percentage, Some(dec("100")));
    }

    #[test]
    fn test_empty_members_returns_empty() {
        let result = calculate_equal_split(amt("42.42"), &[], 4);

        assert!(result.splits.is_empty());
        assert_eq!(result.audit_step.step_number, 4);
    }

    #[test]
    fn test_audit_step_records_calculation() {
        let result = calculate_equal_split(amt("100.00"), &ids(&["A", "B", "C"]), 2);

        assert_eq!(result.audit_step.rule_id, "equal_split");
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.input["total"].as_str().unwrap(), "100.00");
        assert_eq!(result.audit_step.output["base"].as_str().unwrap(), "33.33");
        assert_eq!(result.audit_step.output["remainder_cents"], 1);
        assert!(result.audit_step.reasoning.contains("$100.00"));
        assert!(result.audit_step.reasoning.contains("$33.33"));
    }
}

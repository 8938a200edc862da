use super::rules::Rules;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

pub fn validate_rules(rules: &Rules) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    // Funds
    if rules.min_fund > rules.max_fund {
        errors.push(ValidationError::new(format!(
            "funds.min ({}) is greater than funds.max ({})",
            rules.min_fund, rules.max_fund
        )));
    } else if !rules.fund_in_range(rules.default_fund) {
        errors.push(ValidationError::new(format!(
            "funds.default ({}) lies outside {}..={}",
            rules.default_fund, rules.min_fund, rules.max_fund
        )));
    }
    if rules.min_fund <= 0 {
        errors.push(ValidationError::new("funds.min must be positive"));
    }

    // Items
    if rules.placement_range <= 0 {
        errors.push(ValidationError::new("items.placement_range must be positive"));
    }
    if rules.robot_range == 0 {
        errors.push(ValidationError::new("items.robot_range must be positive"));
    }
    for (label, price) in [
        ("items.barrier_price", rules.barrier_price),
        ("items.robot_price", rules.robot_price),
        ("items.bomb_price", rules.bomb_price),
    ] {
        if price <= 0 {
            errors.push(ValidationError::new(format!("{label} must be positive")));
        }
    }
    if rules.max_items == 0 {
        errors.push(ValidationError::new("items.max_items must be positive"));
    }

    // Fortune
    if rules.fortune_max_cooldown == 0 {
        errors.push(ValidationError::new("fortune.max_cooldown must be positive"));
    }
    if rules.fortune_duration == 0 {
        errors.push(ValidationError::new("fortune.duration must be positive"));
    }
    if rules.fortune_spawn_attempts == 0 {
        errors.push(ValidationError::new("fortune.spawn_attempts must be positive"));
    }

    // Gift
    if rules.gift_cash < 0 || rules.gift_credit < 0 {
        errors.push(ValidationError::new("gift rewards may not be negative"));
    }

    errors
}

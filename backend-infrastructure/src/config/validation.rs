use anyhow::{anyhow, Result};

const MAX_COLUMN_NAME_LEN: usize = 128;

pub fn validate_column_name(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("column name is empty"));
    }
    if trimmed.chars().count() > MAX_COLUMN_NAME_LEN {
        return Err(anyhow!("column name exceeds {} characters", MAX_COLUMN_NAME_LEN));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(anyhow!("column name contains control characters"));
    }
    Ok(())
}

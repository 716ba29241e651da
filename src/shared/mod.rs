pub mod period;
pub mod templates;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

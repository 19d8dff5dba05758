pub mod constants;
pub mod filters;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

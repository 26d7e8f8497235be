pub mod atensi;
pub mod dashboard;
pub mod village;

#[cfg(feature = "integration-test")]
#[cfg(test)]
pub mod test_support;

pub mod atensi;
pub mod dashboard;
pub mod village;

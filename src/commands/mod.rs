pub mod check;
pub mod doctor;
pub mod run;

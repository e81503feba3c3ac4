pub mod logo;
pub mod payslip;

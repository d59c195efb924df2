pub mod assessment;
pub mod question;
pub mod skill;

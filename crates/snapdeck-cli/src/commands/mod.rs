pub mod init;
pub mod positions;
pub mod run;
pub mod simulate;

pub mod entries;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod protection;
pub mod shell;

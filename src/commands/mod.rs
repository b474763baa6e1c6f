pub mod check;
pub mod done;
pub mod init;
pub mod layout;
pub mod list;
pub mod next;

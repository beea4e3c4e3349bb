//! Built-in widgets: Table, Form, Header, Footer, Help, Timer and the Crud
//! record editor.

pub mod crud;
pub mod footer;
pub mod form;
pub mod header;
pub mod help;
pub mod input;
pub mod table;
pub mod timer;

pub use crud::{Crud, CrudState, DataBackend, DataOp, StaticBackend};
pub use footer::Footer;
pub use form::Form;
pub use header::Header;
pub use help::Help;
pub use input::Input;
pub use table::Table;
pub use timer::Timer;

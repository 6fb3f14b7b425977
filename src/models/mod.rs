mod operation;

pub use operation::{columns, Operation, STATUS_OK};

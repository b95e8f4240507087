pub mod due;
pub mod inbox_ops;
pub mod store_ops;
pub mod task_ops;
pub mod view;

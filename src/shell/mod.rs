//! Command tree: typed commands, the registry and the argument binder.

pub mod binder;
pub mod command;
pub mod registry;

pub use binder::{bind_call, bind_overload, BindError, BindErrorKind, BindOutcome};
pub use command::{
    BoundArgs, Command, Handler, HandlerError, Overload, ParamMode, ParamType, Parameter,
};
pub use registry::Shell;

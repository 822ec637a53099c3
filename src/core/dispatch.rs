pub mod invocation_dispatcher;
pub mod invocation_result;
pub mod method_invoker;

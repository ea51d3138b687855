pub mod threaded_comparison_executor;

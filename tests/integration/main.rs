mod api_tests;
mod session_tests;

mod pickup_tests;
mod records_tests;
mod view_tests;

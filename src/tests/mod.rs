mod router_tests;

pub mod policy_tests;

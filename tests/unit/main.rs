//! Unit test harness — fast tests with canned doubles, no external tools.

mod mocks;

mod collect_tests;

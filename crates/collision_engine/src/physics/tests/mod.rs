//! End-to-end collision tests over a populated entity manager

mod collision_scenarios;

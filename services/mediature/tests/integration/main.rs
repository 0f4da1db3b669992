mod agent_test;
mod helpers;

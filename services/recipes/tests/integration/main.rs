mod helpers;

mod membership_test;
mod reference_test;
mod router_test;

pub mod backward_pass;
pub mod complexity;
pub mod forward_pass;

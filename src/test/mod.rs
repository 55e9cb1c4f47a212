mod descriptor;
mod link;
mod registry;
mod sim_time;
mod support;
mod time_lord;
mod time_units;

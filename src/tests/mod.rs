mod properties;
mod workloads;

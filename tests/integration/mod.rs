/// Integration test root: full boot-to-history flows
mod end_to_end;

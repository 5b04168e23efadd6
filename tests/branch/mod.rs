mod create_branches;

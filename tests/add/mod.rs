mod staging_is_idempotent;

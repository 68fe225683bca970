//! Wire and schema support for every identifier kind.

use ruby_id::{CaseId, CaseTypeId, ItemId, ItemTypeId, OutboxMessageId, Ulid, UserId};

use crate::impl_wire_identifier;

impl_wire_identifier!(UserId, ItemId, ItemTypeId, CaseId, CaseTypeId, OutboxMessageId, Ulid);

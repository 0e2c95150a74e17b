#![allow(dead_code)]

use ipacl_rs::{AclDecision, CountryCode, Rejection, RejectionReason};

pub fn assert_bypassed(decision: AclDecision) {
    match decision {
        AclDecision::Bypassed => {}
        other => panic!("expected bypassed decision, got {:?}", other),
    }
}

pub fn assert_allowed(decision: AclDecision) -> Option<CountryCode> {
    match decision {
        AclDecision::Allowed { country } => country,
        other => panic!("expected allowed decision, got {:?}", other),
    }
}

pub fn assert_rejected(decision: AclDecision) -> (RejectionReason, Rejection) {
    match decision {
        AclDecision::Rejected { reason, response } => (reason, response),
        other => panic!("expected rejected decision, got {:?}", other),
    }
}

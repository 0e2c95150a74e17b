mod common;

use common::asserts::{assert_allowed, assert_bypassed, assert_rejected};
use common::builders::{ESTONIAN_IP, US_IP, acl, request};
use ipacl_rs::RejectionHandler;
use std::sync::Arc;
use std::thread;

#[test]
fn acl_can_be_shared_across_threads() {
    let acl = Arc::new(acl().rejection(RejectionHandler::status(403)).build());

    let mut handles = Vec::new();
    for i in 0..8 {
        let acl = Arc::clone(&acl);
        handles.push(thread::spawn(move || {
            let estonian = format!("81.20.{}.{}", i, i + 1);
            let country = assert_allowed(request(estonian.as_str()).check(&acl));
            assert!(matches!(country, Some(code) if code == "EE"));

            let (_, response) = assert_rejected(request(US_IP).check(&acl));
            assert_eq!(response.status, 403);

            assert_bypassed(request("127.0.0.1").check(&acl));
            assert_allowed(request(ESTONIAN_IP).check(&acl));
        }));
    }

    for handle in handles {
        handle.join().expect("thread panic");
    }
}

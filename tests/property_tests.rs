//! Property-based checks over the pure lifecycle functions and the photo
//! store.

use bytes::Bytes;
use chrono::{Duration, Utc};
use proptest::prelude::*;
use valvetrack::lifecycle;
use valvetrack::models::{NewWorkOrder, WorkOrder};
use valvetrack::photos::{Capture, PhotoAttachmentStore};

fn pending_order() -> WorkOrder {
    WorkOrder::create(
        NewWorkOrder {
            work_order_no: "WO-2024-077".into(),
            job_title: "Ball Valve Inspection".into(),
            valve_tag: "BV-077".into(),
            location: "Unit 4".into(),
            description: "Routine inspection.".into(),
            ..Default::default()
        },
        Utc::now(),
    )
}

proptest! {
    /// Whatever the clock does between start and completion, the derived
    /// actual time is non-negative and has one decimal place.
    #[test]
    fn actual_time_is_clamped_and_rounded(offset_secs in -86_400i64..86_400i64) {
        let t0 = Utc::now();
        let started = lifecycle::start(&pending_order(), t0).unwrap().order;
        let done = lifecycle::complete(&started, t0 + Duration::seconds(offset_secs))
            .unwrap()
            .order;
        let actual_time = done.actual_time.unwrap();
        prop_assert!(actual_time >= 0.0);
        prop_assert!((actual_time * 10.0 - (actual_time * 10.0).round()).abs() < 1e-6);
    }

    /// N successful attaches raise the photo count by exactly N.
    #[test]
    fn photo_count_is_monotonic(n in 0u32..20) {
        let mut order = lifecycle::start(&pending_order(), Utc::now()).unwrap().order;
        let before = order.photo_count;
        for _ in 0..n {
            order = lifecycle::attach_photo(&order, Utc::now()).unwrap().order;
        }
        prop_assert_eq!(order.photo_count, before + n);
    }

    /// The store never holds more than its cap, every over-cap capture is
    /// reported, and ending the session releases every handle.
    #[test]
    fn store_respects_cap_and_releases_all(max in 1usize..8, attempts in 0usize..24) {
        let mut store = PhotoAttachmentStore::new(max);
        let mut exceeded = 0usize;
        for _ in 0..attempts {
            if store.capture(Bytes::from_static(b"img"), Utc::now()) == Capture::CapacityExceeded {
                exceeded += 1;
            }
        }
        prop_assert!(store.len() <= max);
        prop_assert_eq!(store.len() + exceeded, attempts);

        store.clear();
        prop_assert_eq!(store.ledger().outstanding(), 0);
    }
}

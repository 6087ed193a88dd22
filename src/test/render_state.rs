use crate::error::RenderError;
use crate::player::{Readout, RenderEffect, RenderHost, RenderState};
use crate::trace::Reason;

#[test]
fn markers_and_flags_accumulate() {
    let mut state = RenderState::default();
    state.apply(&RenderEffect::AddMarker { id: 1 }).unwrap();
    state
        .apply(&RenderEffect::AddFlag {
            id: 1,
            reason: Reason::Quacked,
        })
        .unwrap();
    state
        .apply(&RenderEffect::AddFlag {
            id: 1,
            reason: Reason::Acked,
        })
        .unwrap();

    let m = state.marker(1).expect("marker 1");
    assert!(m.is_visible());
    assert!(m.has_flag(&Reason::Quacked));
    assert!(m.has_flag(&Reason::Acked));
    assert!(!m.has_flag(&Reason::DetectLostPackets));
    assert_eq!(state.visible_markers(), vec![1]);
}

#[test]
fn removing_unknown_marker_is_reported() {
    let mut state = RenderState::default();
    let err = state.apply(&RenderEffect::RemoveMarker { id: 9 }).unwrap_err();
    assert_eq!(
        err,
        RenderError::UnknownMarkerReference {
            id: 9,
            reason: "sent".to_string()
        }
    );

    state
        .apply(&RenderEffect::AddFlag {
            id: 9,
            reason: Reason::Acked,
        })
        .unwrap();
    // 只有 flag、没有可见实例
    assert!(state.apply(&RenderEffect::RemoveMarker { id: 9 }).is_err());
    let err = state
        .apply(&RenderEffect::RemoveFlag {
            id: 9,
            reason: Reason::Quacked,
        })
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::UnknownMarkerReference {
            id: 9,
            reason: "quacked".to_string()
        }
    );
}

#[test]
fn repeated_adds_need_matching_removes() {
    let mut state = RenderState::default();
    state.apply(&RenderEffect::AddMarker { id: 3 }).unwrap();
    state.apply(&RenderEffect::AddMarker { id: 3 }).unwrap();
    state.apply(&RenderEffect::RemoveMarker { id: 3 }).unwrap();
    assert!(state.marker(3).expect("still there").is_visible());
    state.apply(&RenderEffect::RemoveMarker { id: 3 }).unwrap();
    assert!(state.marker(3).is_none());
    assert_eq!(state, RenderState::default());
}

#[test]
fn clear_drops_markers_and_readout() {
    let mut state = RenderState::default();
    state.apply(&RenderEffect::AddMarker { id: 1 }).unwrap();
    state
        .apply(&RenderEffect::Readout(Readout {
            index: 0,
            t: 0.0,
            metrics: Default::default(),
        }))
        .unwrap();
    assert!(state.readout().is_some());
    state.apply(&RenderEffect::Clear).unwrap();
    assert!(state.markers().is_empty());
    assert!(state.readout().is_none());
}

#[test]
fn effects_print_one_line_each() {
    assert_eq!(RenderEffect::AddMarker { id: 4 }.to_string(), "+ 4");
    assert_eq!(RenderEffect::RemoveMarker { id: 4 }.to_string(), "- 4");
    assert_eq!(
        RenderEffect::AddFlag {
            id: 4,
            reason: Reason::Acked
        }
        .to_string(),
        "+ 4 acked"
    );
    let readout = RenderEffect::Readout(Readout {
        index: 2,
        t: 1.5,
        metrics: [("cwnd".to_string(), 14600)].into_iter().collect(),
    });
    assert_eq!(readout.to_string(), "@ 2 t=1.500000 cwnd=14600");
}

#[test]
fn effects_serialize_with_kind_tag() {
    let v = serde_json::to_value(RenderEffect::RemoveFlag {
        id: 5,
        reason: Reason::SidecarDetectLostPackets,
    })
    .expect("serialize");
    assert_eq!(v["kind"], "remove_flag");
    assert_eq!(v["id"], 5);
    assert_eq!(v["reason"], "sidecar_detect_lost_packets");
}

//! End-to-end segmentation and alignment scenarios.

use clipx_events::{
    parse_scene_list, AlignmentConfig, EventSegmenter, EventSource, MatchKind, MemoryEventSource,
    SceneAligner, SegmentationConfig,
};
use clipx_models::{EventQuery, EventRecord, Scene, TagTypeFilter};

fn identity(tag: &str, t: f64, score: f64) -> EventRecord {
    EventRecord::new(t, t + 1.0, tag, "identity", "face", score)
}

fn shot(begin: f64, end: f64) -> EventRecord {
    EventRecord::new(begin, end, "cut", "shot", "shot", 0.9)
}

fn segmenter(score: f64, duration: f64, expand: f64) -> EventSegmenter {
    EventSegmenter::new(
        SegmentationConfig::default()
            .with_score_threshold(score)
            .with_duration_threshold(duration)
            .with_duration_expand(expand),
    )
    .unwrap()
}

/// A strong identity yields one scene; a weak one yields none.
#[test]
fn test_high_and_low_identity_groups() {
    let mut events: Vec<EventRecord> = (0..10).map(|i| identity("alice", i as f64, 0.9)).collect();
    events.extend((0..10).map(|i| identity("bob", i as f64, 0.1)));

    let result = segmenter(0.8, 8.0, 2.0).segment(&events);

    assert_eq!(result.scenes.len(), 1);
    let scene = &result.scenes[0];
    assert_eq!(scene.group.as_ref().unwrap().tag, "alice");
    assert!((scene.time_begin - 0.0).abs() < 1e-9);
    assert!((scene.time_end - 9.0).abs() < 1e-9);
    assert!((scene.score.unwrap() - 0.9).abs() < 1e-9);

    assert_eq!(result.report.groups.len(), 2);
    let empty: Vec<&str> = result.report.empty_groups().map(|g| g.key.tag.as_str()).collect();
    assert_eq!(empty, vec!["bob"]);
}

/// Repeated runs over shuffled input give identical output.
#[test]
fn test_segmentation_is_deterministic() {
    let mut events: Vec<EventRecord> = (0..40)
        .map(|i| {
            let tag = if i % 3 == 0 { "carol" } else { "dave" };
            identity(tag, (i / 2) as f64, 0.85 + (i % 5) as f64 * 0.02)
        })
        .collect();
    let segmenter = segmenter(0.8, 4.0, 2.0);

    let first = segmenter.segment(&events);
    events.reverse();
    let second = segmenter.segment(&events);

    assert_eq!(first.scenes, second.scenes);
    assert_eq!(first.report, second.report);
}

/// Segmented scenes snap outward to shot boundaries.
#[test]
fn test_segment_then_align() {
    let mut events: Vec<EventRecord> = (0..10).map(|i| identity("alice", 10.0 + i as f64, 0.95)).collect();
    events.extend([shot(0.0, 8.5), shot(8.5, 21.0), shot(21.0, 30.0)]);
    let source = MemoryEventSource::new(events);

    let faces = source
        .events(&EventQuery::new(TagTypeFilter::tag_type("identity")))
        .unwrap();
    let shots = source
        .events(&EventQuery::new(TagTypeFilter::tag_type("shot")))
        .unwrap();

    let segmentation = segmenter(0.8, 8.0, 2.0).segment(&faces);
    assert_eq!(segmentation.scenes.len(), 1);
    assert_eq!(segmentation.scenes[0].bounds(), (10.0, 19.0));

    let aligner = SceneAligner::new(AlignmentConfig::default(), &shots, None).unwrap();
    let alignment = aligner.align(&segmentation.scenes);

    let scene = &alignment.scenes[0];
    assert_eq!(scene.bounds(), (8.5, 21.0));
    assert_eq!(scene.group.as_ref().unwrap().tag, "alice");
    assert_eq!(alignment.report.begin_matches.found, 1);
    assert_eq!(alignment.report.end_matches.found, 1);
}

/// Start snaps to the latest start at or before it, end to the earliest end at or after it.
#[test]
fn test_align_scene_between_candidates() {
    let events = vec![
        EventRecord::new(8.0, 18.0, "cut", "shot", "shot", 0.9),
        EventRecord::new(12.0, 41.0, "cut", "shot", "shot", 0.9),
        EventRecord::new(50.0, 60.0, "cut", "shot", "shot", 0.9),
    ];
    let aligner = SceneAligner::new(AlignmentConfig::default().with_min_score(0.5), &events, None).unwrap();
    let alignment = aligner.align(&[Scene::new(10.0, 40.0)]);

    let scene = &alignment.scenes[0];
    assert_eq!(scene.time_begin, 8.0);
    assert_eq!(scene.time_end, 41.0);
    assert!(scene.time_end >= scene.time_begin);
}

/// A scene whose bounds are themselves events is returned unchanged.
#[test]
fn test_alignment_round_trip() {
    let scenes = parse_scene_list("5,25\n30 55\n").unwrap();
    let events: Vec<EventRecord> = scenes
        .iter()
        .flat_map(|s| [shot(s.time_begin, s.time_begin + 1.0), shot(s.time_end - 1.0, s.time_end)])
        .collect();

    let aligner = SceneAligner::new(AlignmentConfig::default(), &events, None).unwrap();
    let alignment = aligner.align(&scenes);

    for (before, after) in scenes.iter().zip(&alignment.scenes) {
        assert_eq!(before.bounds(), after.bounds());
        assert!(after.event_begin.is_some());
        assert!(after.event_end.is_some());
    }
}

/// Primary misses recover through the fallback set, or keep their own bounds.
#[test]
fn test_recovery_paths() {
    let primary = vec![EventRecord::new(100.0, 101.0, "line", "transcript", "asr", 0.9)];
    let fallback = vec![shot(4.0, 6.0), shot(6.0, 12.0)];
    let config = AlignmentConfig::default().with_allow_flip(false);

    let aligner = SceneAligner::new(config.clone(), &primary, Some(&fallback)).unwrap();
    let alignment = aligner.align(&[Scene::new(5.0, 10.0)]);
    assert_eq!(alignment.scenes[0].bounds(), (4.0, 101.0));
    assert_eq!(alignment.report.begin_matches.fallback, 1);
    assert_eq!(alignment.report.end_matches.found, 1);

    let aligner = SceneAligner::new(config, &[], None).unwrap();
    let alignment = aligner.align(&[Scene::new(5.0, 10.0)]);
    assert_eq!(alignment.scenes[0].bounds(), (5.0, 10.0));
    let kinds: Vec<(MatchKind, usize)> = alignment.report.end_matches.iter().collect();
    assert_eq!(kinds[3], (MatchKind::Default, 1));
}

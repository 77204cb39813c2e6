//! Scan phase ordering, correlation and recovery

use super::fixtures::{mpls_bytes, DiscBuilder, MockDecoder, FEATURE_STREAMS};
use crate::config::{RecoveryConfig, RecoveryMode};
use crate::decode::HeaderDecoder;
use crate::error::BdError;
use crate::records::{FrameRate, StreamType, TsStream};
use crate::scan::{ScanDecision, ScanOutcome, ScanPhase, ScanPolicies};
use crate::summary::DiscSummary;

/// Disc with empty placeholder files; the mock decoder never reads them
fn placeholder_disc(clips: &[&str], playlists: &[&str], streams: &[(&str, usize)]) -> DiscBuilder {
    let mut disc = DiscBuilder::new();
    for id in clips {
        disc = disc.file(&format!("BDMV/CLIPINF/{}.clpi", id), b"");
    }
    for id in playlists {
        disc = disc.file(&format!("BDMV/PLAYLIST/{}.mpls", id), b"");
    }
    for (id, size) in streams {
        disc = disc.file(&format!("BDMV/STREAM/{}.m2ts", id), &vec![0u8; *size]);
    }
    disc
}

fn skip_all<'a>() -> ScanPolicies<'a> {
    ScanPolicies::new()
        .on_clip_error(|_, _| ScanDecision::Continue)
        .on_playlist_error(|_, _| ScanDecision::Continue)
        .on_stream_file_error(|_, _| ScanDecision::Continue)
}

#[test]
fn test_interleave_link() {
    let disc = placeholder_disc(&[], &[], &[("00001", 10), ("00002", 10)]).ssif("00001");
    let mut bd = disc.open().unwrap();
    bd.scan(&mut ScanPolicies::new(), &mut MockDecoder::new()).unwrap();

    assert_eq!(
        bd.stream_files["00001.M2TS"].interleaved_file.as_deref(),
        Some("00001.SSIF")
    );
    assert_eq!(bd.stream_files["00002.M2TS"].interleaved_file, None);
}

#[test]
fn test_stream_files_scan_smallest_first() {
    let disc = placeholder_disc(&[], &[], &[("00001", 200), ("00002", 100), ("00003", 300)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new();
    let report = bd.scan(&mut ScanPolicies::new(), &mut decoder).unwrap();

    assert_eq!(
        report.stream_file_order,
        vec!["00002.M2TS", "00001.M2TS", "00003.M2TS"]
    );
    assert_eq!(
        decoder.calls_in("stream"),
        vec!["00002.M2TS", "00001.M2TS", "00003.M2TS"]
    );
}

#[test]
fn test_phase_order() {
    let disc = placeholder_disc(&["00001"], &["00001"], &[("00001", 10)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new();
    bd.scan(&mut ScanPolicies::new(), &mut decoder).unwrap();

    assert_eq!(
        decoder.calls,
        vec!["clip:00001.CLPI", "playlist:00001.MPLS", "stream:00001.M2TS"]
    );
}

#[test]
fn test_playlist_failure_with_continue() {
    let disc = placeholder_disc(&[], &["00001", "00002", "00003"], &[]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new().failing("00002.MPLS");

    let mut seen = Vec::new();
    let mut policies = ScanPolicies::new().on_playlist_error(|playlist, _| {
        seen.push(playlist.name.clone());
        ScanDecision::Continue
    });
    let report = bd.scan(&mut policies, &mut decoder).unwrap();
    drop(policies);

    assert_eq!(seen, vec!["00002.MPLS"]);
    assert!(report.is_complete());
    assert_eq!(report.failed_files(), vec!["00002.MPLS"]);
    assert_eq!(
        decoder.calls_in("playlist"),
        vec!["00001.MPLS", "00002.MPLS", "00003.MPLS"]
    );
    assert!(bd.playlists["00003.MPLS"].scanned);
    assert!(!bd.playlists["00002.MPLS"].scanned);
}

#[test]
fn test_playlist_failure_with_abort() {
    let disc = placeholder_disc(&["00001"], &["00001", "00002", "00003"], &[("00001", 10)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new()
        .with_clip(
            "00001.CLPI",
            vec![TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps50)],
        )
        .with_playlist("00003.MPLS", &["00001"], false)
        .failing("00002.MPLS");

    let mut policies = ScanPolicies::new().on_playlist_error(|_, _| ScanDecision::Abort);
    let report = bd.scan(&mut policies, &mut decoder).unwrap();

    assert_eq!(
        report.outcome,
        ScanOutcome::Aborted {
            phase: ScanPhase::Playlists
        }
    );
    assert_eq!(report.failed_files(), vec!["00002.MPLS"]);
    assert_eq!(decoder.calls_in("playlist"), vec!["00001.MPLS", "00002.MPLS"]);
    assert!(decoder.calls_in("stream").is_empty());
    // post-scan pass did not run
    assert!(!bd.is_50hz);
    assert!(bd.playlists.values().all(|p| p.video_streams.is_empty()));
}

#[test]
fn test_failure_without_policy_is_fatal() {
    let disc = placeholder_disc(&[], &["00001", "00002", "00003"], &[]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new().failing("00002.MPLS");

    let err = bd.scan(&mut ScanPolicies::new(), &mut decoder).unwrap_err();
    match err {
        BdError::RecordScan {
            phase,
            file,
            source,
        } => {
            assert_eq!(phase, ScanPhase::Playlists);
            assert_eq!(file, "00002.MPLS");
            assert!(source.to_string().contains("injected failure"));
        }
        other => panic!("expected RecordScan, got {:?}", other),
    }
    assert_eq!(decoder.calls_in("playlist"), vec!["00001.MPLS", "00002.MPLS"]);
}

#[test]
fn test_policies_are_per_phase() {
    let disc = placeholder_disc(&["00001"], &["00001"], &[("00001", 10)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new().failing("00001.MPLS");

    let mut clip_calls = 0;
    let mut policies = ScanPolicies::new()
        .on_clip_error(|_, _| {
            clip_calls += 1;
            ScanDecision::Abort
        })
        .on_playlist_error(|_, _| ScanDecision::Continue);
    let report = bd.scan(&mut policies, &mut decoder).unwrap();
    drop(policies);

    assert!(report.is_complete());
    assert_eq!(clip_calls, 0);
    assert_eq!(report.failures_in(ScanPhase::Playlists).count(), 1);
    assert_eq!(report.failures_in(ScanPhase::Clips).count(), 0);
    assert_eq!(decoder.calls_in("stream"), vec!["00001.M2TS"]);
}

#[test]
fn test_clip_abort_stops_before_playlists() {
    let disc = placeholder_disc(&["00001", "00002"], &["00001"], &[]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new().failing("00001.CLPI");

    let mut policies = ScanPolicies::new().on_clip_error(|_, _| ScanDecision::Abort);
    let report = bd.scan(&mut policies, &mut decoder).unwrap();

    assert_eq!(
        report.outcome,
        ScanOutcome::Aborted {
            phase: ScanPhase::Clips
        }
    );
    assert_eq!(decoder.calls_in("clip"), vec!["00001.CLPI"]);
    assert!(decoder.calls_in("playlist").is_empty());
    assert!(report.stream_file_order.is_empty());
}

#[test]
fn test_summary_after_clip_abort_lists_catalog() {
    let disc = placeholder_disc(&["00001"], &["00001"], &[("00001", 20), ("00002", 10)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new().failing("00001.CLPI");

    let mut policies = ScanPolicies::new().on_clip_error(|_, _| ScanDecision::Abort);
    let report = bd.scan(&mut policies, &mut decoder).unwrap();
    let summary = DiscSummary::new(&bd, &report);

    assert_eq!(summary.stream_files.len(), bd.stream_files.len());
    let names: Vec<&str> = summary.stream_files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["00001.M2TS", "00002.M2TS"]);
    assert_eq!(summary.playlists.len(), 1);
    assert_eq!(summary.failures.len(), 1);
}

#[test]
fn test_stream_file_abort_keeps_earlier_failures() {
    let disc = placeholder_disc(&[], &["00001"], &[("00001", 10), ("00002", 20)]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new()
        .failing("00001.MPLS")
        .failing("00001.M2TS");

    let mut policies = ScanPolicies::new()
        .on_playlist_error(|_, _| ScanDecision::Continue)
        .on_stream_file_error(|_, _| ScanDecision::Abort);
    let report = bd.scan(&mut policies, &mut decoder).unwrap();

    assert_eq!(
        report.outcome,
        ScanOutcome::Aborted {
            phase: ScanPhase::StreamFiles
        }
    );
    assert_eq!(report.failed_files(), vec!["00001.MPLS", "00001.M2TS"]);
    assert_eq!(decoder.calls_in("stream"), vec!["00001.M2TS"]);
}

#[test]
fn test_stream_files_receive_referencing_playlists() {
    let disc = placeholder_disc(
        &[],
        &["00001", "00002", "00003"],
        &[("00001", 10), ("00002", 20), ("00003", 30)],
    );
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new()
        .with_playlist("00001.MPLS", &["00001", "00002"], false)
        .with_playlist("00002.MPLS", &["00002"], false);
    bd.scan(&mut skip_all(), &mut decoder).unwrap();

    let passed = &decoder.stream_file_playlists;
    assert_eq!(passed["00001.M2TS"], vec!["00001.MPLS"]);
    assert_eq!(passed["00002.M2TS"], vec!["00001.MPLS", "00002.MPLS"]);
    assert!(passed["00003.M2TS"].is_empty());
    assert!(bd.playlists["00001.MPLS"].stream_clips[1].stream_file_present);
}

#[test]
fn test_base_view_classification() {
    for base_view_right in [true, false] {
        let disc = placeholder_disc(&["00001"], &["00001"], &[("00001", 10)]);
        let mut bd = disc.open().unwrap();
        let mut decoder = MockDecoder::new()
            .with_clip(
                "00001.CLPI",
                vec![
                    TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps23_976),
                    TsStream::video(0x1012, StreamType::MvcVideo, FrameRate::Fps23_976),
                    TsStream::new(0x1100, StreamType::Ac3),
                ],
            )
            .with_playlist("00001.MPLS", &["00001"], base_view_right);
        bd.scan(&mut ScanPolicies::new(), &mut decoder).unwrap();

        let videos = &bd.playlists["00001.MPLS"].video_streams;
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].stream_type, StreamType::AvcVideo);
        assert_eq!(videos[0].base_view, Some(base_view_right));
        assert_eq!(videos[1].stream_type, StreamType::MvcVideo);
        assert_eq!(videos[1].base_view, Some(!base_view_right));
    }
}

#[test]
fn test_base_views_classified_after_50hz_found() {
    let disc = placeholder_disc(&["00001", "00002"], &["00001", "00002"], &[]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new()
        .with_clip(
            "00001.CLPI",
            vec![TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps25)],
        )
        .with_clip(
            "00002.CLPI",
            vec![
                TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps50),
                TsStream::video(0x1012, StreamType::MvcVideo, FrameRate::Fps50),
            ],
        )
        .with_playlist("00001.MPLS", &["00001"], false)
        .with_playlist("00002.MPLS", &["00002"], true);
    bd.scan(&mut skip_all(), &mut decoder).unwrap();

    assert!(bd.is_50hz);
    let videos = &bd.playlists["00002.MPLS"].video_streams;
    assert_eq!(videos[0].base_view, Some(true));
    assert_eq!(videos[1].base_view, Some(false));
    assert_eq!(bd.playlists["00001.MPLS"].video_streams[0].base_view, None);
}

#[test]
fn test_60hz_disc() {
    let disc = placeholder_disc(&["00001"], &["00001"], &[]);
    let mut bd = disc.open().unwrap();
    let mut decoder = MockDecoder::new()
        .with_clip(
            "00001.CLPI",
            vec![TsStream::video(0x1011, StreamType::AvcVideo, FrameRate::Fps23_976)],
        )
        .with_playlist("00001.MPLS", &["00001"], false);
    bd.scan(&mut ScanPolicies::new(), &mut decoder).unwrap();
    assert!(!bd.is_50hz);
}

#[test]
fn test_header_decoder_end_to_end() {
    let stereo = [(0x1011, 0x1B, 1), (0x1012, 0x20, 1), (0x1100, 0x86, 0)];
    let disc = DiscBuilder::new()
        .title("00001", 8, FEATURE_STREAMS)
        .title("00002", 2, &[(0x1011, 0x1B, 6), (0x1100, 0x81, 0)])
        .clip("00003", &stereo)
        .stream("00003", 4)
        .ssif("00003")
        .file("BDMV/PLAYLIST/00003.mpls", &mpls_bytes(&["00003"], &stereo, true));
    let mut bd = disc.open().unwrap();
    let report = bd.scan(&mut ScanPolicies::new(), &mut HeaderDecoder).unwrap();

    assert!(report.is_complete());
    assert!(report.failures.is_empty());
    assert_eq!(
        report.stream_file_order,
        vec!["00002.M2TS", "00003.M2TS", "00001.M2TS"]
    );
    assert!(bd.features.is_3d);
    assert!(bd.is_50hz);

    let feature = &bd.stream_files["00001.M2TS"];
    assert!(feature.scanned);
    assert_eq!(feature.streams.len(), 3);
    assert_eq!(feature.frame_rate, FrameRate::Fps23_976);
    assert_eq!(feature.playlists, vec!["00001.MPLS"]);
    assert!(!feature.has_mvc);

    let stereo_file = &bd.stream_files["00003.M2TS"];
    assert!(stereo_file.has_mvc);
    assert_eq!(stereo_file.interleaved_file.as_deref(), Some("00003.SSIF"));

    let playlist = &bd.playlists["00003.MPLS"];
    assert!(playlist.mvc_base_view_r);
    assert_eq!(playlist.video_streams.len(), 2);
    assert_eq!(playlist.video_streams[0].base_view, Some(true));
    assert_eq!(playlist.video_streams[1].base_view, Some(false));

    let json = DiscSummary::new(&bd, &report).to_json().unwrap();
    assert!(json.contains("\"00003.SSIF\""));
    assert!(json.contains("\"completed\""));
}

#[test]
fn test_header_decoder_skips_corrupt_files() {
    let disc = DiscBuilder::new()
        .title("00001", 2, FEATURE_STREAMS)
        .clip("00002", FEATURE_STREAMS)
        .file("BDMV/STREAM/00002.m2ts", &[0u8; 100])
        .playlist("00002", &["00002"], &[])
        .file("BDMV/PLAYLIST/00003.mpls", b"MPLS9999");
    let mut bd = disc.open().unwrap();

    let mut policies = ScanPolicies::from_config(&RecoveryConfig {
        clip: RecoveryMode::Fail,
        playlist: RecoveryMode::Skip,
        stream_file: RecoveryMode::Skip,
    });
    let report = bd.scan(&mut policies, &mut HeaderDecoder).unwrap();

    assert!(report.is_complete());
    let mut failed = report.failed_files();
    failed.sort();
    assert_eq!(failed, vec!["00002.M2TS", "00003.MPLS"]);
    assert!(bd.stream_files["00001.M2TS"].scanned);
    assert!(!bd.stream_files["00002.M2TS"].scanned);
    assert_eq!(bd.playlists["00002.MPLS"].video_streams.len(), 1);
}

#[test]
fn test_header_decoder_keeps_missing_stream_file_reference() {
    let disc = DiscBuilder::new()
        .clip("00001", FEATURE_STREAMS)
        .playlist("00001", &["00001", "00009"], &[]);
    let mut bd = disc.open().unwrap();
    bd.scan(&mut ScanPolicies::new(), &mut HeaderDecoder).unwrap();

    let clips = &bd.playlists["00001.MPLS"].stream_clips;
    assert_eq!(clips.len(), 2);
    assert!(!clips[0].stream_file_present);
    assert_eq!(clips[1].name, "00009.M2TS");
    assert!(clips[1].streams.is_empty());
}

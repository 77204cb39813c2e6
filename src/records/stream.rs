//! Elementary stream descriptors shared by clips, playlists and stream files

use serde::Serialize;

/// Stream coding type as declared in clip-info and playlist stream tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StreamType {
    Mpeg1Video,
    Mpeg2Video,
    AvcVideo,
    MvcVideo,
    HevcVideo,
    Vc1Video,
    Mpeg1Audio,
    Mpeg2Audio,
    Lpcm,
    Ac3,
    Dts,
    TrueHd,
    Ac3Plus,
    DtsHd,
    DtsHdMaster,
    Ac3PlusSecondary,
    DtsHdSecondary,
    PresentationGraphics,
    InteractiveGraphics,
    TextSubtitle,
    Unknown(u8),
}

impl From<u8> for StreamType {
    fn from(code: u8) -> Self {
        match code {
            0x01 => StreamType::Mpeg1Video,
            0x02 => StreamType::Mpeg2Video,
            0x1B => StreamType::AvcVideo,
            0x20 => StreamType::MvcVideo,
            0x24 => StreamType::HevcVideo,
            0xEA => StreamType::Vc1Video,
            0x03 => StreamType::Mpeg1Audio,
            0x04 => StreamType::Mpeg2Audio,
            0x80 => StreamType::Lpcm,
            0x81 => StreamType::Ac3,
            0x82 => StreamType::Dts,
            0x83 => StreamType::TrueHd,
            0x84 => StreamType::Ac3Plus,
            0x85 => StreamType::DtsHd,
            0x86 => StreamType::DtsHdMaster,
            0xA1 => StreamType::Ac3PlusSecondary,
            0xA2 => StreamType::DtsHdSecondary,
            0x90 => StreamType::PresentationGraphics,
            0x91 => StreamType::InteractiveGraphics,
            0x92 => StreamType::TextSubtitle,
            other => StreamType::Unknown(other),
        }
    }
}

impl StreamType {
    /// The coding type byte
    pub fn code(self) -> u8 {
        match self {
            StreamType::Mpeg1Video => 0x01,
            StreamType::Mpeg2Video => 0x02,
            StreamType::AvcVideo => 0x1B,
            StreamType::MvcVideo => 0x20,
            StreamType::HevcVideo => 0x24,
            StreamType::Vc1Video => 0xEA,
            StreamType::Mpeg1Audio => 0x03,
            StreamType::Mpeg2Audio => 0x04,
            StreamType::Lpcm => 0x80,
            StreamType::Ac3 => 0x81,
            StreamType::Dts => 0x82,
            StreamType::TrueHd => 0x83,
            StreamType::Ac3Plus => 0x84,
            StreamType::DtsHd => 0x85,
            StreamType::DtsHdMaster => 0x86,
            StreamType::Ac3PlusSecondary => 0xA1,
            StreamType::DtsHdSecondary => 0xA2,
            StreamType::PresentationGraphics => 0x90,
            StreamType::InteractiveGraphics => 0x91,
            StreamType::TextSubtitle => 0x92,
            StreamType::Unknown(code) => code,
        }
    }

    pub fn is_video(self) -> bool {
        matches!(
            self,
            StreamType::Mpeg1Video
                | StreamType::Mpeg2Video
                | StreamType::AvcVideo
                | StreamType::MvcVideo
                | StreamType::HevcVideo
                | StreamType::Vc1Video
        )
    }

    pub fn is_audio(self) -> bool {
        matches!(
            self,
            StreamType::Mpeg1Audio
                | StreamType::Mpeg2Audio
                | StreamType::Lpcm
                | StreamType::Ac3
                | StreamType::Dts
                | StreamType::TrueHd
                | StreamType::Ac3Plus
                | StreamType::DtsHd
                | StreamType::DtsHdMaster
                | StreamType::Ac3PlusSecondary
                | StreamType::DtsHdSecondary
        )
    }
}

/// Video frame rate code (low nibble of the video attribute byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FrameRate {
    #[default]
    Unknown,
    Fps23_976,
    Fps24,
    Fps25,
    Fps29_97,
    Fps50,
    Fps59_94,
}

impl FrameRate {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => FrameRate::Fps23_976,
            2 => FrameRate::Fps24,
            3 => FrameRate::Fps25,
            4 => FrameRate::Fps29_97,
            6 => FrameRate::Fps50,
            7 => FrameRate::Fps59_94,
            _ => FrameRate::Unknown,
        }
    }

    /// True for the PAL family rates (25 and 50 fps)
    pub fn is_50hz(self) -> bool {
        matches!(self, FrameRate::Fps25 | FrameRate::Fps50)
    }
}

/// One elementary stream, identified by its PID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TsStream {
    pub pid: u16,
    pub stream_type: StreamType,
    /// `Unknown` for anything that is not video
    pub frame_rate: FrameRate,
}

impl TsStream {
    pub fn new(pid: u16, stream_type: StreamType) -> Self {
        Self {
            pid,
            stream_type,
            frame_rate: FrameRate::Unknown,
        }
    }

    pub fn video(pid: u16, stream_type: StreamType, frame_rate: FrameRate) -> Self {
        Self {
            pid,
            stream_type,
            frame_rate,
        }
    }
}

/// Video stream of a playlist after the post-scan pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStream {
    pub pid: u16,
    pub stream_type: StreamType,
    pub frame_rate: FrameRate,
    /// Set only for AVC/MVC streams of playlists carrying more than one
    /// video stream; `Some(false)` marks the dependent view.
    pub base_view: Option<bool>,
}

impl From<&TsStream> for VideoStream {
    fn from(stream: &TsStream) -> Self {
        Self {
            pid: stream.pid,
            stream_type: stream.stream_type,
            frame_rate: stream.frame_rate,
            base_view: None,
        }
    }
}

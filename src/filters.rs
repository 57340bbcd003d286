//! Catálogo estático de filtros de audio.
//!
//! Cada preset mapea un identificador estable a un nombre legible y a una
//! expresión de grafo de filtros ffmpeg que la fábrica de fuentes aplica al
//! construir el stream. `None` es el centinela sin expresión.

/// Presets de filtro disponibles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPreset {
    None,
    BassBoost,
    Nightcore,
    Vaporwave,
    Treble,
    Echo,
    Vibrato,
    Tremolo,
    Distortion,
    Mono,
    VolumeBoost,
    LoFi,
    Chorus,
    Reverse,
    Phaser,
    Chipmunk,
    SlowMo,
    Robot,
    Underwater,
    Telephone,
    Crystalize,
    Compressor,
    Earwax,
    Reverb,
    StereoWide,
    PitchUp,
    PitchDown,
    EightBit,
}

impl FilterPreset {
    /// Todos los presets, en el orden en que se ofrecen al usuario
    pub const ALL: [FilterPreset; 28] = [
        FilterPreset::None,
        FilterPreset::BassBoost,
        FilterPreset::Nightcore,
        FilterPreset::Vaporwave,
        FilterPreset::Treble,
        FilterPreset::Echo,
        FilterPreset::Vibrato,
        FilterPreset::Tremolo,
        FilterPreset::Distortion,
        FilterPreset::Mono,
        FilterPreset::VolumeBoost,
        FilterPreset::LoFi,
        FilterPreset::Chorus,
        FilterPreset::Reverse,
        FilterPreset::Phaser,
        FilterPreset::Chipmunk,
        FilterPreset::SlowMo,
        FilterPreset::Robot,
        FilterPreset::Underwater,
        FilterPreset::Telephone,
        FilterPreset::Crystalize,
        FilterPreset::Compressor,
        FilterPreset::Earwax,
        FilterPreset::Reverb,
        FilterPreset::StereoWide,
        FilterPreset::PitchUp,
        FilterPreset::PitchDown,
        FilterPreset::EightBit,
    ];

    /// Identificador estable (el valor que viaja en los comandos)
    pub fn value(&self) -> &'static str {
        match self {
            FilterPreset::None => "none",
            FilterPreset::BassBoost => "bassboost",
            FilterPreset::Nightcore => "nightcore",
            FilterPreset::Vaporwave => "vaporwave",
            FilterPreset::Treble => "treble",
            FilterPreset::Echo => "echo",
            FilterPreset::Vibrato => "vibrato",
            FilterPreset::Tremolo => "tremolo",
            FilterPreset::Distortion => "distortion",
            FilterPreset::Mono => "mono",
            FilterPreset::VolumeBoost => "volume_boost",
            FilterPreset::LoFi => "lofi",
            FilterPreset::Chorus => "chorus",
            FilterPreset::Reverse => "reverse",
            FilterPreset::Phaser => "phaser",
            FilterPreset::Chipmunk => "chipmunk",
            FilterPreset::SlowMo => "slowmo",
            FilterPreset::Robot => "robot",
            FilterPreset::Underwater => "underwater",
            FilterPreset::Telephone => "telephone",
            FilterPreset::Crystalize => "crystalize",
            FilterPreset::Compressor => "compressor",
            FilterPreset::Earwax => "earwax",
            FilterPreset::Reverb => "reverb",
            FilterPreset::StereoWide => "stereowide",
            FilterPreset::PitchUp => "pitch_up",
            FilterPreset::PitchDown => "pitch_down",
            FilterPreset::EightBit => "8bit",
        }
    }

    /// Nombre legible para mostrar al usuario
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterPreset::None => "None",
            FilterPreset::BassBoost => "Bass Boost",
            FilterPreset::Nightcore => "Nightcore",
            FilterPreset::Vaporwave => "Vaporwave",
            FilterPreset::Treble => "Treble Boost",
            FilterPreset::Echo => "Echo",
            FilterPreset::Vibrato => "Vibrato",
            FilterPreset::Tremolo => "Tremolo",
            FilterPreset::Distortion => "Distortion",
            FilterPreset::Mono => "Mono",
            FilterPreset::VolumeBoost => "Volume Boost",
            FilterPreset::LoFi => "Lo-Fi",
            FilterPreset::Chorus => "Chorus",
            FilterPreset::Reverse => "Reverse",
            FilterPreset::Phaser => "Phaser",
            FilterPreset::Chipmunk => "Chipmunk",
            FilterPreset::SlowMo => "Slow Motion",
            FilterPreset::Robot => "Robot Voice",
            FilterPreset::Underwater => "Underwater",
            FilterPreset::Telephone => "Telephone",
            FilterPreset::Crystalize => "Crystalize",
            FilterPreset::Compressor => "Compressor",
            FilterPreset::Earwax => "Earwax",
            FilterPreset::Reverb => "Shimmering Reverb",
            FilterPreset::StereoWide => "Stereo Wide",
            FilterPreset::PitchUp => "Pitch Up",
            FilterPreset::PitchDown => "Pitch Down",
            FilterPreset::EightBit => "8-Bit",
        }
    }

    /// Expresión del grafo de filtros ffmpeg, `None` para el preset sin filtro
    pub fn expression(&self) -> Option<&'static str> {
        match self {
            FilterPreset::None => None,
            FilterPreset::BassBoost => Some("bass=g=10"),
            FilterPreset::Nightcore => Some("asetrate=48000*1.25,aresample=48000,atempo=0.8"),
            FilterPreset::Vaporwave => Some("asetrate=48000*0.8,aresample=48000,atempo=1.1"),
            FilterPreset::Treble => Some("treble=g=5"),
            FilterPreset::Echo => Some("aecho=0.8:0.88:60:0.4"),
            FilterPreset::Vibrato => Some("vibrato=f=6.5:d=0.5"),
            FilterPreset::Tremolo => Some("tremolo=f=6.5:d=0.5"),
            FilterPreset::Distortion => Some("areverse,areverse"),
            FilterPreset::Mono => Some("pan=mono|c0=0.5*c0+0.5*c1"),
            FilterPreset::VolumeBoost => Some("volume=2.0"),
            FilterPreset::LoFi => Some("aresample=8000,aresample=44100"),
            FilterPreset::Chorus => {
                Some("chorus=0.5:0.9:50|60|40:0.4|0.32|0.3:0.25|0.4|0.3:2|2.3|1.3")
            }
            FilterPreset::Reverse => Some("areverse"),
            FilterPreset::Phaser => Some(
                "aphaser=in_gain=0.4:out_gain=0.74:delay=3:decay=0.4:speed=0.5:type=triangular",
            ),
            FilterPreset::Chipmunk => Some("asetrate=48000*1.5,aresample=48000"),
            FilterPreset::SlowMo => Some("asetrate=48000*0.5,aresample=48000"),
            FilterPreset::Robot => Some(
                "afftfilt=real='hypot(re,im)*sin(0)':imag='hypot(re,im)*cos(0)':win_size=512:overlap=0.75",
            ),
            FilterPreset::Underwater => {
                Some("lowpass=f=800,highpass=f=200,chorus=0.7:0.9:55:0.4:0.25:2")
            }
            FilterPreset::Telephone => Some("highpass=f=900,lowpass=f=3000"),
            FilterPreset::Crystalize => Some("crystalizer=intensity=0.7:resonance=0.5"),
            FilterPreset::Compressor => {
                Some("acompressor=threshold=0.089:ratio=9:attack=200:release=1000")
            }
            FilterPreset::Earwax => Some("earwax"),
            FilterPreset::Reverb => Some(
                "aecho=0.8:0.88:1000:0.6,aecho=0.8:0.9:1500:0.4,aecho=0.8:0.92:2000:0.3,volume=0.8",
            ),
            FilterPreset::StereoWide => {
                Some("stereowiden=delay=20:feedback=0.3:crossfeed=0.3:drymix=0.8")
            }
            FilterPreset::PitchUp => Some("asetrate=48000*1.2,aresample=48000,atempo=0.833"),
            FilterPreset::PitchDown => Some("asetrate=48000*0.8,aresample=48000,atempo=1.25"),
            FilterPreset::EightBit => {
                Some("aresample=8000:resampler=soxr,aresample=48000:resampler=soxr")
            }
        }
    }

    /// Busca un preset por su identificador; los desconocidos caen en `None`
    pub fn from_value(value: &str) -> FilterPreset {
        FilterPreset::ALL
            .iter()
            .copied()
            .find(|preset| preset.value() == value)
            .unwrap_or(FilterPreset::None)
    }
}

//! Built-in sound catalog

use super::SoundDescriptor;

/// Raw rows of the built-in catalog, in display order
const BUILTIN_SOUNDS: [(&str, &str, &str, &str, &str, &str); 6] = [
    (
        "ocean",
        "Ocean Waves",
        "Rolling surf and distant gulls for a coastal escape.",
        "https://cdn.pixabay.com/download/audio/2021/09/02/audio_845b844a74.mp3?filename=waves-sea-ambient-113524.mp3",
        "from-sky-500/30 via-cyan-400/20 to-indigo-500/30",
        "Pixabay — Waves Sea Ambient",
    ),
    (
        "rain",
        "Gentle Rain",
        "Soft rainfall on leaves to help you unwind and focus.",
        "https://cdn.pixabay.com/download/audio/2021/08/04/audio_b6bccc50e9.mp3?filename=light-rain-ambient-110418.mp3",
        "from-blue-500/30 via-teal-400/20 to-emerald-500/30",
        "Pixabay — Light Rain Ambient",
    ),
    (
        "forest",
        "Forest Birds",
        "Morning birdsong and rustling trees in a lush forest.",
        "https://cdn.pixabay.com/download/audio/2021/08/08/audio_962f8d833b.mp3?filename=forest-birds-ambience-110777.mp3",
        "from-emerald-600/30 via-lime-500/20 to-amber-400/30",
        "Pixabay — Forest Birds Ambience",
    ),
    (
        "fireplace",
        "Fireplace Crackle",
        "Warm crackling fire to bring cozy fireplace vibes.",
        "https://cdn.pixabay.com/download/audio/2021/10/27/audio_34e65e073f.mp3?filename=fireplace-crackling-ambience-124516.mp3",
        "from-amber-500/30 via-orange-500/20 to-rose-500/30",
        "Pixabay — Fireplace Crackling Ambience",
    ),
    (
        "cafe",
        "City Café",
        "Urban cafe hum with soft chatter and the clink of mugs.",
        "https://cdn.pixabay.com/download/audio/2021/09/07/audio_db2666ebf2.mp3?filename=cafe-ambience-113501.mp3",
        "from-purple-500/30 via-violet-400/20 to-fuchsia-500/30",
        "Pixabay — Cafe Ambience",
    ),
    (
        "white-noise",
        "Airy Noise",
        "Balanced white noise to help mask distractions.",
        "https://cdn.pixabay.com/download/audio/2022/01/13/audio_65b6d85d74.mp3?filename=white-noise-ambient-15287.mp3",
        "from-zinc-500/30 via-slate-400/20 to-neutral-500/30",
        "Pixabay — White Noise Ambient",
    ),
];

/// Descriptors of the built-in catalog
pub(super) fn builtin_sounds() -> Vec<SoundDescriptor> {
    BUILTIN_SOUNDS
        .iter()
        .map(|&(id, title, description, url, color_theme, attribution)| SoundDescriptor {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            attribution: attribution.to_string(),
            url: url.to_string(),
            color_theme: color_theme.to_string(),
        })
        .collect()
}

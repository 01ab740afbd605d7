//! Embedded quote table and the reveal/hide state of the displayed quote.

use rand::{Rng, seq::IndexedRandom};

/// Shown in place of the quote card when no quote could be picked.
pub const QUOTE_ERROR: &str = "Unable to fetch quote. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub original: &'static str,
    pub translation: &'static str,
    pub reference: &'static str,
    pub reflection: &'static str,
}

pub static QUOTES: [Quote; 10] = [
    Quote {
        original: "إِنَّ اللَّهَ مَعَ الصَّابِرِينَ",
        translation: "Indeed, Allah is with the patient.",
        reference: "Quran 2:153",
        reflection: "This verse reminds us that Allah's support and help are always available to those who remain patient in the face of difficulties.",
    },
    Quote {
        original: "وَمَن يَتَوَكَّلْ عَلَى اللَّهِ فَهُوَ حَسْبُهُ",
        translation: "And whoever relies upon Allah - then He is sufficient for him.",
        reference: "Quran 65:3",
        reflection: "This verse teaches us the importance of putting our trust in Allah, knowing that He will provide for all our needs.",
    },
    Quote {
        original: "إِنَّ اللَّهَ لَا يُغَيِّرُ مَا بِقَوْمٍ حَتَّىٰ يُغَيِّرُوا مَا بِأَنفُسِهِمْ",
        translation: "Indeed, Allah will not change the condition of a people until they change what is in themselves.",
        reference: "Quran 13:11",
        reflection: "This verse emphasizes personal responsibility and the power of self-improvement in bringing about positive change.",
    },
    Quote {
        original: "فَإِنَّ مَعَ الْعُسْرِ يُسْرًا",
        translation: "For indeed, with hardship [will be] ease.",
        reference: "Quran 94:5",
        reflection: "This verse provides hope that every difficulty is followed by ease and relief from Allah.",
    },
    Quote {
        original: "وَلَا تَقْفُ مَا لَيْسَ لَكَ بِهِ عِلْمٌ",
        translation: "And do not pursue that of which you have no knowledge.",
        reference: "Quran 17:36",
        reflection: "This verse encourages us to seek knowledge and avoid making assumptions or judgments without proper understanding.",
    },
    Quote {
        original: "إِنَّ اللَّهَ يَأْمُرُ بِالْعَدْلِ وَالْإِحْسَانِ",
        translation: "Indeed, Allah orders justice and good conduct.",
        reference: "Quran 16:90",
        reflection: "This verse highlights the importance of justice and kindness in our daily lives and interactions with others.",
    },
    Quote {
        original: "وَلَا تَنْسَوُا الْفَضْلَ بَيْنَكُمْ",
        translation: "And do not forget the favor between you.",
        reference: "Quran 2:237",
        reflection: "This verse reminds us to remember and appreciate the kindness and favors we receive from others.",
    },
    Quote {
        original: "إِنَّ اللَّهَ لَا يُحِبُّ مَن كَانَ مُخْتَالًا فَخُورًا",
        translation: "Indeed, Allah does not like those who are arrogant and boastful.",
        reference: "Quran 4:36",
        reflection: "This verse teaches us the importance of humility and warns against arrogance and pride.",
    },
    Quote {
        original: "وَجَعَلْنَا مِنَ الْمَاءِ كُلَّ شَيْءٍ حَيٍّ",
        translation: "And We made from water every living thing.",
        reference: "Quran 21:30",
        reflection: "This verse highlights the miracle of creation and the importance of water as a source of life.",
    },
    Quote {
        original: "إِنَّ اللَّهَ لَا يَظْلِمُ مِثْقَالَ ذَرَّةٍ",
        translation: "Indeed, Allah does not do injustice, [even] as much as an atom's weight.",
        reference: "Quran 4:40",
        reflection: "This verse assures us of Allah's perfect justice and fairness in all matters.",
    },
];

/// Uniform pick from `table`; `None` only when the table is empty.
pub fn pick_from<'a, R: Rng + ?Sized>(table: &'a [Quote], rng: &mut R) -> Option<&'a Quote> {
    table.choose(rng)
}

/// Uniform pick from the embedded table. Repeats are allowed.
pub fn pick_random_quote<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static Quote> {
    pick_from(&QUOTES, rng)
}

/// The displayed quote and whether its reflection is revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteState {
    current: Option<&'static Quote>,
    reflection_visible: bool,
}

impl QuoteState {
    /// Replace the displayed quote. The reflection starts hidden.
    pub fn show(&mut self, quote: Option<&'static Quote>) {
        if quote.is_none() {
            tracing::error!("No quote available");
        }
        self.current = quote;
        self.reflection_visible = false;
    }

    pub fn current(&self) -> Option<&'static Quote> {
        self.current
    }

    pub fn reflection_visible(&self) -> bool {
        self.reflection_visible
    }

    /// Only meaningful while a quote is displayed.
    pub fn toggle_reflection(&mut self) {
        if self.current.is_some() {
            self.reflection_visible = !self.reflection_visible;
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.reflection_visible {
            "Hide"
        } else {
            "Reflection"
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.current.is_none().then_some(QUOTE_ERROR)
    }
}

use lectern_common::Flashcard;

/// Shows a created flashcard, one side at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardPresenter {
    card: Flashcard,
    flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace<'a> {
    Front { text: &'a str, thumbnail: &'a str },
    Back { text: &'a str },
}

impl FlashcardPresenter {
    pub fn new(card: Flashcard) -> Self {
        Self {
            card,
            flipped: false,
        }
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn face(&self) -> CardFace<'_> {
        if self.flipped {
            CardFace::Back {
                text: &self.card.back,
            }
        } else {
            CardFace::Front {
                text: &self.card.front,
                thumbnail: &self.card.thumbnail,
            }
        }
    }
}

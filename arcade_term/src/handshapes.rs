use arcade_core::common::letter_index;

// Indexed by letter, A first
const HANDSHAPES: [&str; 26] = [
    "Fist, thumb resting against the side of the index finger",
    "Flat hand, fingers together and up, thumb folded across the palm",
    "Hand curved into the shape of a C",
    "Index finger up, other fingertips touching the thumb",
    "Fingertips curled down over the thumb tucked beneath them",
    "Index finger and thumb touching in a circle, other fingers spread up",
    "Index finger and thumb pointing sideways, parallel",
    "Index and middle fingers together, pointing sideways",
    "Fist with only the little finger raised",
    "Little finger raised, tracing a hook in the air",
    "Index and middle fingers up in a V, thumb touching the middle finger",
    "Index finger up and thumb out at a right angle",
    "Thumb tucked under the first three fingers",
    "Thumb tucked under the first two fingers",
    "All fingertips touching the thumb, forming a circle",
    "The V with thumb on the middle finger, pointed downward",
    "Index finger and thumb pointing downward, parallel",
    "Index and middle fingers crossed",
    "Fist with the thumb across the front of the fingers",
    "Thumb tucked between the index and middle fingers",
    "Index and middle fingers up, held together",
    "Index and middle fingers up, spread apart",
    "Index, middle and ring fingers up, spread apart",
    "Index finger bent into a hook",
    "Thumb and little finger extended, other fingers folded",
    "Index finger tracing a zigzag in the air",
];

/// Description of the fingerspelled handshape for an uppercase letter.
pub fn handshape(letter: char) -> Option<&'static str> {
    letter_index(letter).map(|index| HANDSHAPES[index])
}

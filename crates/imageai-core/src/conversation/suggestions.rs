/// Starter prompts offered on an empty conversation.
pub const DEFAULT_SUGGESTIONS: [&str; 6] = [
    "A futuristic city at sunset with flying cars",
    "A magical forest with glowing mushrooms",
    "An astronaut riding a horse on Mars",
    "A steampunk robot in a Victorian library",
    "A dragon made of crystal and light",
    "An underwater palace with colorful coral",
];

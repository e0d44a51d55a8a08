/// A board of the library. The backend accepts any board name; these are
/// the ones offered to scribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub name: &'static str,
    pub description: &'static str,
}

/// Where new scrolls go when no board is given.
pub const DEFAULT_BOARD: &str = "TheIronThrone";

pub const BOARDS: [Board; 10] = [
    Board {
        name: "TheIronThrone",
        description: "The center of the realm. General discussion for all subjects.",
    },
    Board {
        name: "GOTLore",
        description: "Uncover the secrets of the past. History, symbolism, and prophecy.",
    },
    Board {
        name: "FanTheories",
        description: "Wear your tinfoil hats. Speculation and predictions welcome.",
    },
    Board {
        name: "ShowVsBooks",
        description: "The Ink vs The Screen. Debating changes and adaptations.",
    },
    Board {
        name: "HouseStark",
        description: "Winter is Coming. For the wolves of the North.",
    },
    Board {
        name: "HouseTargaryen",
        description: "Fire and Blood. Dragons, Valyria, and the conquest.",
    },
    Board {
        name: "Characters",
        description: "Heroes and Villains. Deep dives into specific characters.",
    },
    Board {
        name: "GOTMemes",
        description: "A little levity in grim times. Memes and humor.",
    },
    Board {
        name: "GOTFanArt",
        description: "The beauty of Westeros. Art, cosplay, and creations.",
    },
    Board {
        name: "TheCitadel",
        description: "The Order of Maesters. Meta, rules, and announcements.",
    },
];

/// Looks a board up by name, ignoring case like the backend does.
pub fn find(name: &str) -> Option<&'static Board> {
    BOARDS.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

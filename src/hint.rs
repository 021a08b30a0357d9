use crate::color::{Channel, Color};

/// Name the channel that is furthest from the target and which way it is off.
///
/// Channels are checked red, green, blue and a later one only wins with a
/// strictly larger error. Returns an empty string once every channel matches.
pub fn hint_for(target: Color, current: Color) -> String {
    let error = current.error_from(target);

    let mut worst = Channel::Red;
    for channel in Channel::ALL {
        if error.get(channel).abs() > error.get(worst).abs() {
            worst = channel;
        }
    }

    match error.get(worst) {
        0 => String::new(),
        e if e < 0 => format!("Too much {worst}"),
        _ => format!("Too little {worst}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_little_red_from_black() {
        assert_eq!(hint_for(Color::new(255, 0, 0), Color::BLACK), "Too little red");
    }

    #[test]
    fn too_much_when_overshooting() {
        assert_eq!(
            hint_for(Color::new(10, 10, 10), Color::new(10, 10, 200)),
            "Too much blue"
        );
    }

    #[test]
    fn ties_resolve_in_channel_order() {
        assert_eq!(
            hint_for(Color::new(0, 50, 50), Color::new(0, 0, 100)),
            "Too little green"
        );
        assert_eq!(
            hint_for(Color::new(100, 100, 100), Color::new(0, 200, 100)),
            "Too little red"
        );
    }

    #[test]
    fn empty_when_matched() {
        let c = Color::new(1, 2, 3);
        assert_eq!(hint_for(c, c), "");
    }
}

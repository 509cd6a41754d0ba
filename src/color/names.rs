//! Named colors
//!
//! Besides the CSS names (several of them remapped to softer tones), the
//! table carries the palette names the themes are built from (`pearl02`,
//! `grey08`, `polar*`, `henanigans_*`).

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name to hex table, keys are lowercase
pub static COLOR_NAMES: &[(&str, &str)] = &[
    ("aliceblue", "#F0F8FF"),
    ("antiquewhite", "#FAEBD7"),
    ("aqua", "#00FFFF"),
    ("aquamarine", "#7FFFD4"),
    ("azure", "#F0FFFF"),
    ("beige", "#F5F5DC"),
    ("bisque", "#FFE4C4"),
    ("black", "#000000"),
    ("blanchedalmond", "#FFEBCD"),
    ("blue", "#3780bf"),
    ("bluegray", "#565656"),
    ("bluepurple", "#6432AB"),
    ("blueviolet", "#8A2BE2"),
    ("brick", "#E24A33"),
    ("brightblue", "#0000FF"),
    ("brightred", "#FF0000"),
    ("brown", "#A52A2A"),
    ("burlywood", "#DEB887"),
    ("cadetblue", "#5F9EA0"),
    ("charcoal", "#151516"),
    ("chartreuse", "#7FFF00"),
    ("chocolate", "#D2691E"),
    ("coral", "#FF7F50"),
    ("cornflowerblue", "#6495ED"),
    ("cornsilk", "#FFF8DC"),
    ("crimson", "#DC143C"),
    ("cyan", "#00FFFF"),
    ("darkblue", "#00008B"),
    ("darkcyan", "#008B8B"),
    ("darkgoldenrod", "#B8860B"),
    ("darkgray", "#A9A9A9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#A9A9A9"),
    ("darkkhaki", "#BDB76B"),
    ("darkmagenta", "#8B008B"),
    ("darkolivegreen", "#556B2F"),
    ("darkorange", "#FF8C00"),
    ("darkorchid", "#9932CC"),
    ("darkred", "#8B0000"),
    ("darksalmon", "#E9967A"),
    ("darkseagreen", "#8FBC8F"),
    ("darkslateblue", "#483D8B"),
    ("darkslategray", "#2F4F4F"),
    ("darkslategrey", "#2F4F4F"),
    ("darkturquoise", "#00CED1"),
    ("darkviolet", "#9400D3"),
    ("deeppink", "#FF1493"),
    ("deepskyblue", "#00BFFF"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1E90FF"),
    ("firebrick", "#B22222"),
    ("floralwhite", "#FFFAF0"),
    ("forestgreen", "#228B22"),
    ("fuchsia", "#FF00FF"),
    ("gainsboro", "#DCDCDC"),
    ("ghostwhite", "#F8F8FF"),
    ("gold", "#FFD700"),
    ("goldenrod", "#DAA520"),
    ("grassgreen", "#32ab60"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#ADFF2F"),
    ("grey", "#808080"),
    ("grey01", "#0A0A0A"),
    ("grey02", "#151516"),
    ("grey03", "#1A1A1C"),
    ("grey04", "#1E1E21"),
    ("grey05", "#252529"),
    ("grey06", "#36363C"),
    ("grey07", "#3C3C42"),
    ("grey08", "#434343"),
    ("grey09", "#666570"),
    ("grey10", "#666666"),
    ("grey11", "#8C8C8C"),
    ("grey12", "#C2C2C2"),
    ("grey13", "#E2E2E2"),
    ("grey14", "#E5E5E5"),
    ("honeydew", "#F0FFF0"),
    ("hotpink", "#FF69B4"),
    ("indianred", "#CD5C5C"),
    ("indigo", "#4B0082"),
    ("ivory", "#FFFFF0"),
    ("java", "#17BECF"),
    ("khaki", "#F0E68C"),
    ("lavender", "#E6E6FA"),
    ("lavenderblush", "#FFF0F5"),
    ("lawngreen", "#7CFC00"),
    ("lemonchiffon", "#FFFACD"),
    ("lightpink2", "#fccde5"),
    ("lightpurple", "#bc80bd"),
    ("lightblue", "#ADD8E6"),
    ("lightcoral", "#F08080"),
    ("lightcyan", "#E0FFFF"),
    ("lightgoldenrodyellow", "#FAFAD2"),
    ("lightgray", "#D3D3D3"),
    ("lightgreen", "#90EE90"),
    ("lightgrey", "#D3D3D3"),
    ("lightivory", "#F6F6F6"),
    ("lightpink", "#FFB6C1"),
    ("lightsalmon", "#FFA07A"),
    ("lightseagreen", "#20B2AA"),
    ("lightskyblue", "#87CEFA"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#B0C4DE"),
    ("lightteal", "#8dd3c7"),
    ("lightyellow", "#FFFFE0"),
    ("lightblue2", "#80b1d3"),
    ("lightviolet", "#8476CA"),
    ("lime", "#00FF00"),
    ("lime2", "#8EBA42"),
    ("limegreen", "#32CD32"),
    ("linen", "#FAF0E6"),
    ("magenta", "#FF00FF"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66CDAA"),
    ("mediumblue", "#0000CD"),
    ("mediumgray", "#656565"),
    ("mediumorchid", "#BA55D3"),
    ("mediumpurple", "#9370DB"),
    ("mediumseagreen", "#3CB371"),
    ("mediumslateblue", "#7B68EE"),
    ("mediumspringgreen", "#00FA9A"),
    ("mediumturquoise", "#48D1CC"),
    ("mediumvioletred", "#C71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#F5FFFA"),
    ("mistyrose", "#FFE4E1"),
    ("moccasin", "#FFE4B5"),
    ("mustard", "#FBC15E"),
    ("navajowhite", "#FFDEAD"),
    ("navy", "#000080"),
    ("oldlace", "#FDF5E6"),
    ("olive", "#808000"),
    ("olivedrab", "#6B8E23"),
    ("orange", "#ff9933"),
    ("orangered", "#FF4500"),
    ("orchid", "#DA70D6"),
    ("palegoldenrod", "#EEE8AA"),
    ("palegreen", "#98FB98"),
    ("paleolive", "#b3de69"),
    ("paleturquoise", "#AFEEEE"),
    ("palevioletred", "#DB7093"),
    ("papayawhip", "#FFEFD5"),
    ("peachpuff", "#FFDAB9"),
    ("pearl", "#D9D9D9"),
    ("pearl02", "#F5F6F9"),
    ("pearl03", "#E1E5ED"),
    ("pearl04", "#9499A3"),
    ("pearl05", "#6F7B8B"),
    ("pearl06", "#4D5663"),
    ("peru", "#CD853F"),
    ("pink", "#ff0088"),
    ("pinksalmon", "#FFB5B8"),
    ("plum", "#DDA0DD"),
    ("polar", "#ACAFB5"),
    ("polarblue", "#0080F0"),
    ("polarbluelight", "#46A0F0"),
    ("polarcyan", "#ADFCFC"),
    ("polardark", "#484848"),
    ("polardiv", "#D5D8DB"),
    ("polardust", "#F2F3F7"),
    ("polargrey", "#505050"),
    ("polargreen", "#309054"),
    ("polarorange", "#EE7600"),
    ("polarpurple", "#6262DE"),
    ("polarred", "#D94255"),
    ("powderblue", "#B0E0E6"),
    ("purple", "#800080"),
    ("red", "#db4052"),
    ("rose", "#FFC0CB"),
    ("rosybrown", "#BC8F8F"),
    ("royalblue", "#4169E1"),
    ("saddlebrown", "#8B4513"),
    ("salmon", "#fb8072"),
    ("sandybrown", "#FAA460"),
    ("seaborn", "#EAE7E4"),
    ("seagreen", "#2E8B57"),
    ("seashell", "#FFF5EE"),
    ("sienna", "#A0522D"),
    ("silver", "#C0C0C0"),
    ("skyblue", "#87CEEB"),
    ("slateblue", "#6A5ACD"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("smurf", "#3E6FB0"),
    ("snow", "#FFFAFA"),
    ("springgreen", "#00FF7F"),
    ("steelblue", "#4682B4"),
    ("tan", "#D2B48C"),
    ("teal", "#008080"),
    ("thistle", "#D8BFD8"),
    ("tomato", "#FF6347"),
    ("turquoise", "#40E0D0"),
    ("violet", "#EE82EE"),
    ("wheat", "#F5DEB3"),
    ("white", "#FFFFFF"),
    ("whitesmoke", "#F5F5F5"),
    ("yellow", "#ffff33"),
    ("yellowgreen", "#9ACD32"),
    ("henanigans_bg", "#242424"),
    ("henanigans_blue1", "#5F95DE"),
    ("henanigans_blue2", "#93B6E6"),
    ("henanigans_cyan1", "#7EC4CF"),
    ("henanigans_cyan2", "#B6ECF3"),
    ("henanigans_dark1", "#040404"),
    ("henanigans_dark2", "#141414"),
    ("henanigans_dialog1", "#444459"),
    ("henanigans_dialog2", "#5D5D7A"),
    ("henanigans_green1", "#8BD155"),
    ("henanigans_green2", "#A0D17B"),
    ("henanigans_grey1", "#343434"),
    ("henanigans_grey2", "#444444"),
    ("henanigans_light1", "#A4A4A4"),
    ("henanigans_light2", "#F4F4F4"),
    ("henanigans_orange1", "#EB9E58"),
    ("henanigans_orange2", "#EBB483"),
    ("henanigans_purple1", "#C98FDE"),
    ("henanigans_purple2", "#AC92DE"),
    ("henanigans_red1", "#F77E70"),
    ("henanigans_red2", "#DE958E"),
    ("henanigans_yellow1", "#E8EA7E"),
    ("henanigans_yellow2", "#E9EABE"),
];

static NAME_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| COLOR_NAMES.iter().copied().collect());

/// Hex value for a color name, matched case-insensitively.
pub fn lookup(name: &str) -> Option<&'static str> {
    NAME_INDEX.get(name.trim().to_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("Pearl02"), Some("#F5F6F9"));
        assert_eq!(lookup("blue"), Some("#3780bf"));
        assert_eq!(lookup(" grey08 "), Some("#434343"));
        assert_eq!(lookup("henanigans_bg"), Some("#242424"));
        assert_eq!(lookup("not-a-color"), None);
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(NAME_INDEX.len(), COLOR_NAMES.len());
    }
}

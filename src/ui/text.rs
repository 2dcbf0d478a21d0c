use crate::surface::{Caption, Rgba, TextLayout};

pub const TEXT_COLOR: Rgba = [255, 255, 255, 255];

// 5x7 bitmap font covering ASCII 32..127. One byte per column, LSB = top row.
#[rustfmt::skip]
static FONT_5X7: [[u8; 5]; 96] = [
    [0x00,0x00,0x00,0x00,0x00], [0x00,0x00,0x5F,0x00,0x00], [0x00,0x07,0x00,0x07,0x00], [0x14,0x7F,0x14,0x7F,0x14], //   ! " #
    [0x24,0x2A,0x7F,0x2A,0x12], [0x23,0x13,0x08,0x64,0x62], [0x36,0x49,0x55,0x22,0x50], [0x00,0x05,0x03,0x00,0x00], // $ % & '
    [0x00,0x1C,0x22,0x41,0x00], [0x00,0x41,0x22,0x1C,0x00], [0x14,0x08,0x3E,0x08,0x14], [0x08,0x08,0x3E,0x08,0x08], // ( ) * +
    [0x00,0x50,0x30,0x00,0x00], [0x08,0x08,0x08,0x08,0x08], [0x00,0x60,0x60,0x00,0x00], [0x20,0x10,0x08,0x04,0x02], // , - . /
    [0x3E,0x51,0x49,0x45,0x3E], [0x00,0x42,0x7F,0x40,0x00], [0x42,0x61,0x51,0x49,0x46], [0x21,0x41,0x45,0x4B,0x31], // 0 1 2 3
    [0x18,0x14,0x12,0x7F,0x10], [0x27,0x45,0x45,0x45,0x39], [0x3C,0x4A,0x49,0x49,0x30], [0x01,0x71,0x09,0x05,0x03], // 4 5 6 7
    [0x36,0x49,0x49,0x49,0x36], [0x06,0x49,0x49,0x29,0x1E], [0x00,0x36,0x36,0x00,0x00], [0x00,0x56,0x36,0x00,0x00], // 8 9 : ;
    [0x08,0x14,0x22,0x41,0x00], [0x14,0x14,0x14,0x14,0x14], [0x00,0x41,0x22,0x14,0x08], [0x02,0x01,0x51,0x09,0x06], // < = > ?
    [0x3E,0x41,0x5D,0x55,0x1E], [0x7E,0x11,0x11,0x11,0x7E], [0x7F,0x49,0x49,0x49,0x36], [0x3E,0x41,0x41,0x41,0x22], // @ A B C
    [0x7F,0x41,0x41,0x22,0x1C], [0x7F,0x49,0x49,0x49,0x41], [0x7F,0x09,0x09,0x09,0x01], [0x3E,0x41,0x49,0x49,0x7A], // D E F G
    [0x7F,0x08,0x08,0x08,0x7F], [0x00,0x41,0x7F,0x41,0x00], [0x20,0x40,0x41,0x3F,0x01], [0x7F,0x08,0x14,0x22,0x41], // H I J K
    [0x7F,0x40,0x40,0x40,0x40], [0x7F,0x02,0x0C,0x02,0x7F], [0x7F,0x04,0x08,0x10,0x7F], [0x3E,0x41,0x41,0x41,0x3E], // L M N O
    [0x7F,0x09,0x09,0x09,0x06], [0x3E,0x41,0x51,0x21,0x5E], [0x7F,0x09,0x19,0x29,0x46], [0x46,0x49,0x49,0x49,0x31], // P Q R S
    [0x01,0x01,0x7F,0x01,0x01], [0x3F,0x40,0x40,0x40,0x3F], [0x1F,0x20,0x40,0x20,0x1F], [0x3F,0x40,0x38,0x40,0x3F], // T U V W
    [0x63,0x14,0x08,0x14,0x63], [0x07,0x08,0x70,0x08,0x07], [0x61,0x51,0x49,0x45,0x43], [0x00,0x7F,0x41,0x41,0x00], // X Y Z [
    [0x02,0x04,0x08,0x10,0x20], [0x00,0x41,0x41,0x7F,0x00], [0x04,0x02,0x01,0x02,0x04], [0x40,0x40,0x40,0x40,0x40], // \ ] ^ _
    [0x00,0x01,0x02,0x04,0x00], [0x20,0x54,0x54,0x54,0x78], [0x7F,0x48,0x44,0x44,0x38], [0x38,0x44,0x44,0x44,0x20], // ` a b c
    [0x38,0x44,0x44,0x48,0x7F], [0x38,0x54,0x54,0x54,0x18], [0x08,0x7E,0x09,0x01,0x02], [0x0C,0x52,0x52,0x52,0x3E], // d e f g
    [0x7F,0x08,0x04,0x04,0x78], [0x00,0x44,0x7D,0x40,0x00], [0x20,0x40,0x44,0x3D,0x00], [0x7F,0x10,0x28,0x44,0x00], // h i j k
    [0x00,0x41,0x7F,0x40,0x00], [0x7C,0x04,0x18,0x04,0x78], [0x7C,0x08,0x04,0x04,0x78], [0x38,0x44,0x44,0x44,0x38], // l m n o
    [0x7C,0x14,0x14,0x14,0x08], [0x08,0x14,0x14,0x18,0x7C], [0x7C,0x08,0x04,0x04,0x08], [0x48,0x54,0x54,0x54,0x20], // p q r s
    [0x04,0x3F,0x44,0x40,0x20], [0x3C,0x40,0x40,0x20,0x7C], [0x1C,0x20,0x40,0x20,0x1C], [0x3C,0x40,0x30,0x40,0x3C], // t u v w
    [0x44,0x28,0x10,0x28,0x44], [0x0C,0x50,0x50,0x50,0x3C], [0x44,0x64,0x54,0x4C,0x44], [0x00,0x08,0x36,0x41,0x00], // x y z {
    [0x00,0x00,0x7F,0x00,0x00], [0x00,0x41,0x36,0x08,0x00], [0x10,0x08,0x08,0x10,0x08], [0x00,0x00,0x00,0x00,0x00], // | } ~ DEL
];

/// Glyph for `ch`; anything outside printable ASCII renders as '?'.
fn glyph(ch: char) -> &'static [u8; 5] {
    let idx = (ch as u32).wrapping_sub(32) as usize;
    FONT_5X7.get(idx).unwrap_or(&FONT_5X7[31])
}

/// Text layout with the built-in bitmap font, scaled to roughly `font_size`
/// pixels per line.
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    pub fn new(font_size: u32) -> Self {
        Self {
            scale: (font_size / 7).max(1),
        }
    }

    fn advance(&self) -> u32 {
        6 * self.scale
    }

    fn line_height(&self) -> u32 {
        9 * self.scale
    }

    fn wrap(&self, text: &str, wrap_width: u32) -> Vec<String> {
        let max_chars = (wrap_width / self.advance()).max(1) as usize;
        let mut lines = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            // Hard-split words that cannot fit on any line.
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let line_len = line.chars().count();
            if line_len > 0 && line_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        if !line.is_empty() || lines.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn draw_char(&self, caption: &mut Caption, ch: char, px: u32, py: u32) {
        let bits = glyph(ch);
        for col in 0..5u32 {
            for row in 0..7u32 {
                if bits[col as usize] & (1 << row) == 0 {
                    continue;
                }
                for sy in 0..self.scale {
                    for sx in 0..self.scale {
                        let x = px + col * self.scale + sx;
                        let y = py + row * self.scale + sy;
                        if x < caption.width && y < caption.height {
                            caption.coverage[y as usize * caption.width as usize + x as usize] = 255;
                        }
                    }
                }
            }
        }
    }
}

impl TextLayout for BitmapFont {
    fn layout(&self, text: &str, wrap_width: Option<u32>) -> Caption {
        let lines = match wrap_width {
            Some(w) => self.wrap(text, w),
            None => vec![text.to_string()],
        };
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        let width = longest * self.advance();
        let height = lines.len() as u32 * self.line_height();

        let mut caption = Caption {
            width,
            height,
            coverage: vec![0; width as usize * height as usize],
            color: TEXT_COLOR,
        };
        for (row, line) in lines.iter().enumerate() {
            let py = row as u32 * self.line_height() + self.scale;
            for (i, ch) in line.chars().enumerate() {
                self.draw_char(&mut caption, ch, i as u32 * self.advance(), py);
            }
        }
        caption
    }
}

/// Converts an editor column (UTF-16 code units) into a byte column of the given line.
pub fn utf16_col_to_byte_col(content: &str, line: usize, utf16_col: usize) -> usize {
    let line_content = content.lines().nth(line).unwrap_or("");
    let mut curr_utf16 = 0;
    let mut curr_byte = 0;

    for c in line_content.chars() {
        if curr_utf16 >= utf16_col {
            break;
        }
        curr_utf16 += c.len_utf16();
        curr_byte += c.len_utf8();
    }
    curr_byte
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_columns_are_identity() {
        assert_eq!(utf16_col_to_byte_col("def x = 1", 0, 4), 4);
    }

    #[test]
    fn test_multibyte_prefix_shifts_byte_column() {
        // 'é' is one UTF-16 unit but two bytes.
        assert_eq!(utf16_col_to_byte_col("x\ndef é = 1", 1, 6), 7);
    }
}

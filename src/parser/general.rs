use ndarray::{Array2, ArrayView1};
use nom::{
    branch::alt,
    character::complete::{char, digit1, one_of, space0, space1},
    combinator::{all_consuming, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::error::FormatError;

pub fn decimal(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |out: &str| out.parse::<u32>())(input)
}

pub fn float(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                // Case one: 42, 42. and 42.42
                recognize(tuple((digit1, opt(preceded(char('.'), opt(digit1)))))),
                // Case two: .42
                recognize(preceded(char('.'), digit1)),
            )),
            // Optional exponent: e42, E-42
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |out: &str| out.parse::<f64>(),
    )(input)
}

/// One whitespace-delimited row of numbers, nothing else on the line.
pub fn parse_row(line: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list1(space1, float), space0))(line)
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/**
Numeric table read from a whitespace-delimited text file, as written by
`dos.x`, `projwfc.x` and `bands.x`.
# Notes:
  * Blank lines and `#` comment lines are skipped.
  * Every data row must have the same number of columns.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// dimension = (num_rows, width)
    rows: Array2<f64>,
}

impl Table {
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut width: Option<usize> = None;
        let mut values: Vec<f64> = vec![];
        let mut num_rows = 0_usize;
        for (i, line) in text.lines().enumerate() {
            if is_skipped(line) {
                continue;
            }
            let line_no = i + 1;
            let row = match parse_row(line) {
                Ok((_, row)) => row,
                Err(_) => return Err(invalid_number(line_no, line)),
            };
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(FormatError::InconsistentRow {
                    line: line_no,
                    expected,
                    found: row.len(),
                });
            }
            values.extend(row);
            num_rows += 1;
        }
        let width = width.ok_or(FormatError::Empty)?;
        let rows = Array2::from_shape_vec((num_rows, width), values)
            .map_err(|_| FormatError::Empty)?;
        Ok(Self { rows })
    }

    pub fn width(&self) -> usize {
        self.rows.ncols()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.nrows()
    }

    pub fn column(&self, index: usize) -> Result<ArrayView1<f64>, FormatError> {
        if index >= self.width() {
            return Err(FormatError::MissingColumn {
                index,
                width: self.width(),
            });
        }
        Ok(self.rows.column(index))
    }

    pub fn column_vec(&self, index: usize) -> Result<Vec<f64>, FormatError> {
        Ok(self.column(index)?.to_vec())
    }

    pub fn rows(&self) -> &Array2<f64> {
        &self.rows
    }
}

fn invalid_number(line: usize, text: &str) -> FormatError {
    let token = text
        .split_whitespace()
        .find(|token| all_consuming(float)(token).is_err())
        .unwrap_or(text.trim())
        .to_string();
    FormatError::InvalidNumber { line, token }
}

#[cfg(test)]
mod test {
    use super::{float, parse_row, Table};
    use crate::error::FormatError;

    #[test]
    fn test_float() {
        assert_eq!(float("42").unwrap().1, 42.0);
        assert_eq!(float("-0.125").unwrap().1, -0.125);
        assert_eq!(float(".5").unwrap().1, 0.5);
        assert_eq!(float("1.2345E-02").unwrap().1, 1.2345e-2);
        assert_eq!(float("+3.").unwrap().1, 3.0);
        assert_eq!(float("0.12345678901234").unwrap().1, 0.12345678901234);
        let (rest, value) = float("15.3718 eV").unwrap();
        assert_eq!(value, 15.3718);
        assert_eq!(rest, " eV");
        assert!(float("eV").is_err());
    }

    #[test]
    fn test_parse_row() {
        let (_, row) = parse_row("  -8.000  0.1234E-01  0.5000E+00   1.000 ").unwrap();
        assert_eq!(row, vec![-8.0, 0.01234, 0.5, 1.0]);
        assert!(parse_row("1.0 abc").is_err());
        assert!(parse_row("").is_err());
    }

    #[test]
    fn test_table() {
        let text = "# E (eV) dos(E)\n\n 0.0 1.0\n 0.1 2.0\n\n 0.2 3.0\n";
        let table = Table::parse(text).unwrap();
        assert_eq!(table.width(), 2);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column_vec(1).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            table.column(2).unwrap_err(),
            FormatError::MissingColumn { index: 2, width: 2 }
        );
    }

    #[test]
    fn test_table_errors() {
        assert_eq!(
            Table::parse("0.0 1.0\n0.1 2.0 3.0\n").unwrap_err(),
            FormatError::InconsistentRow {
                line: 2,
                expected: 2,
                found: 3
            }
        );
        assert_eq!(
            Table::parse("# only a header\n\n").unwrap_err(),
            FormatError::Empty
        );
        assert_eq!(
            Table::parse("0.0 1.0\n0.1 NaN?\n").unwrap_err(),
            FormatError::InvalidNumber {
                line: 2,
                token: "NaN?".to_string()
            }
        );
    }
}

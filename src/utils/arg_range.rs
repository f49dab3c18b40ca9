use core::fmt::Display;
use core::str::FromStr;

use crate::errors::CommandError;

/// A pair of coordinates along one axis, given on the command line as `start..end`. The order is kept as given.
#[derive(Clone,Copy,Debug,PartialEq)]
pub(crate) struct AxisRange {
    pub(crate) start: f64,
    pub(crate) end: f64
}

impl AxisRange {

    pub(crate) const fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end
        }
    }

}

impl FromStr for AxisRange {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start,end) = s.split_once("..").ok_or_else(|| CommandError::InvalidRangeArgument(s.to_owned(),"Expected 'start..end'.".to_owned()))?;
        let start = start.trim().parse().map_err(|e| CommandError::InvalidRangeArgument(s.to_owned(),format!("{e}")))?;
        let end = end.trim_start_matches('=').trim().parse().map_err(|e| CommandError::InvalidRangeArgument(s.to_owned(),format!("{e}")))?;
        Ok(Self::new(start,end))
    }
}

impl Display for AxisRange {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f,"{}..{}",self.start,self.end)
    }
}

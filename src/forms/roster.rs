use serde::Deserialize;
use validator::Validate;

use crate::domain::drag::{ItemBounds, ScrollMetrics, Viewport};
use crate::forms::FormError;
use crate::services::roster::DragOver;

#[derive(Debug, Deserialize)]
pub struct DragStartForm {
    pub index: usize,
}

/// Drag-over event as posted by the roster page script.
#[derive(Debug, Deserialize, Validate)]
pub struct DragOverForm {
    pub target_index: usize,
    pub pointer_y: f64,
    pub target_top: f64,
    #[validate(range(min = 0.0))]
    pub target_height: f64,
    pub container_top: f64,
    #[validate(range(min = 0.0))]
    pub client_height: f64,
    #[validate(range(min = 0.0))]
    pub scroll_height: f64,
    #[validate(range(min = 0.0))]
    pub scroll_top: f64,
}

/// Validated drag-over event with the container it scrolls.
#[derive(Debug)]
pub struct DragOverPayload {
    pub event: DragOver,
    pub viewport: Viewport,
}

impl TryFrom<DragOverForm> for DragOverPayload {
    type Error = FormError;

    fn try_from(form: DragOverForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let coordinates = [
            form.pointer_y,
            form.target_top,
            form.target_height,
            form.container_top,
            form.client_height,
            form.scroll_height,
            form.scroll_top,
        ];
        if coordinates.iter().any(|value| !value.is_finite()) {
            return Err(FormError::NonFiniteCoordinate);
        }

        Ok(Self {
            event: DragOver {
                target_index: form.target_index,
                pointer_y: form.pointer_y,
                target_bounds: ItemBounds {
                    top: form.target_top,
                    height: form.target_height,
                },
            },
            viewport: Viewport::new(ScrollMetrics {
                top: form.container_top,
                client_height: form.client_height,
                scroll_height: form.scroll_height,
                scroll_top: form.scroll_top,
            }),
        })
    }
}

/// Pointer position reported while it is outside every row.
#[derive(Debug, Deserialize, Validate)]
pub struct DragScrollForm {
    pub pointer_y: f64,
    pub container_top: f64,
    #[validate(range(min = 0.0))]
    pub client_height: f64,
    #[validate(range(min = 0.0))]
    pub scroll_height: f64,
    #[validate(range(min = 0.0))]
    pub scroll_top: f64,
}

#[derive(Debug)]
pub struct DragScrollPayload {
    pub pointer_y: f64,
    pub viewport: Viewport,
}

impl TryFrom<DragScrollForm> for DragScrollPayload {
    type Error = FormError;

    fn try_from(form: DragScrollForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let coordinates = [
            form.pointer_y,
            form.container_top,
            form.client_height,
            form.scroll_height,
            form.scroll_top,
        ];
        if coordinates.iter().any(|value| !value.is_finite()) {
            return Err(FormError::NonFiniteCoordinate);
        }

        Ok(Self {
            pointer_y: form.pointer_y,
            viewport: Viewport::new(ScrollMetrics {
                top: form.container_top,
                client_height: form.client_height,
                scroll_height: form.scroll_height,
                scroll_top: form.scroll_top,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> DragOverForm {
        DragOverForm {
            target_index: 2,
            pointer_y: 420.0,
            target_top: 400.0,
            target_height: 48.0,
            container_top: 64.0,
            client_height: 700.0,
            scroll_height: 2400.0,
            scroll_top: 120.0,
        }
    }

    #[test]
    fn valid_form_becomes_payload() {
        let payload = DragOverPayload::try_from(form()).expect("valid form");

        assert_eq!(payload.event.target_index, 2);
        assert_eq!(payload.event.target_bounds.height, 48.0);
        assert_eq!(payload.viewport.scroll_top(), 120.0);
    }

    #[test]
    fn negative_geometry_is_rejected() {
        let mut bad = form();
        bad.client_height = -1.0;

        assert!(matches!(
            DragOverPayload::try_from(bad),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn infinite_pointer_is_rejected() {
        let mut bad = form();
        bad.pointer_y = f64::INFINITY;

        assert!(matches!(
            DragOverPayload::try_from(bad),
            Err(FormError::NonFiniteCoordinate)
        ));
    }

    #[test]
    fn scroll_form_checks_geometry() {
        let form = DragScrollForm {
            pointer_y: 900.0,
            container_top: 64.0,
            client_height: 700.0,
            scroll_height: 2400.0,
            scroll_top: 0.0,
        };
        let payload = DragScrollPayload::try_from(form).expect("valid form");
        assert_eq!(payload.pointer_y, 900.0);

        let bad = DragScrollForm {
            pointer_y: f64::NAN,
            container_top: 64.0,
            client_height: 700.0,
            scroll_height: 2400.0,
            scroll_top: 0.0,
        };
        assert!(matches!(
            DragScrollPayload::try_from(bad),
            Err(FormError::NonFiniteCoordinate)
        ));
    }
}
